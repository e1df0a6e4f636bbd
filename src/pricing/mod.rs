//! Talking to the external pricing service.
//!
//! [`PricingService`] is the seam between the submission controller and the
//! transport; [`HttpPricingService`] is the production implementation.

pub mod estimate;
mod http;
mod submit;

pub use estimate::Estimate;
pub use http::{HttpPricingService, rejection_messages};
pub use submit::{Submission, Submitter};

use crate::error::SubmitError;
use crate::normalize::Payload;
use async_trait::async_trait;

/// Something that turns a payload into an estimate.
///
/// Failures are classified: a 4xx-style refusal becomes
/// [`SubmitError::RemoteValidationRejected`], anything else
/// [`SubmitError::RemoteUnavailable`].
#[async_trait]
pub trait PricingService: Send + Sync {
    async fn calculate(&self, payload: &Payload) -> Result<Estimate, SubmitError>;
}
