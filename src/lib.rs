//! Prefab house estimate builder.
//!
//! Collects the inputs of a prefabricated-house cost estimate, keeps them
//! consistent while they are edited, normalizes them into a request for an
//! external pricing service and renders the price breakdown it returns.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod pricing;
pub mod render;
pub mod server;
pub mod store;

pub use error::{ApiError, EditError, ErrorCode, SubmitError, ValidationError};
pub use model::{Configuration, Field};
pub use normalize::{Payload, normalize};
pub use store::{ConfigStore, EditValue};
