//! Submission controller.
//!
//! Normalizes a snapshot, hands it to the pricing service and keeps the
//! estimate that is currently on display. Only one submission may be
//! pending; each gets a sequence number and a result never replaces one
//! with a higher number.

use super::{Estimate, PricingService};
use crate::error::SubmitError;
use crate::model::Configuration;
use crate::normalize::{Payload, normalize};
use arc_swap::ArcSwapOption;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{info, warn};

/// A completed submission.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub seq: u64,
    pub payload: Payload,
    pub estimate: Estimate,
}

/// Clears the in-flight flag when the submission ends, however it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Submitter {
    service: Arc<dyn PricingService>,
    in_flight: AtomicBool,
    next_seq: AtomicU64,
    latest: ArcSwapOption<Submission>,
}

impl Submitter {
    pub fn new(service: Arc<dyn PricingService>) -> Self {
        Self {
            service,
            in_flight: AtomicBool::new(false),
            next_seq: AtomicU64::new(0),
            latest: ArcSwapOption::empty(),
        }
    }

    /// Submit a snapshot.
    ///
    /// Local validation runs first and does not take the in-flight slot.
    /// On failure the displayed estimate is left as it was.
    pub async fn submit(
        &self,
        snapshot: Arc<Configuration>,
    ) -> Result<Arc<Submission>, SubmitError> {
        let payload = normalize(&snapshot)?;

        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(SubmitError::InFlight)?;
        let seq = self.next_seq.fetch_add(1, Ordering::AcqRel) + 1;
        info!(seq, "submitting estimate request");

        match self.service.calculate(&payload).await {
            Ok(estimate) => {
                let submission = Arc::new(Submission {
                    seq,
                    payload,
                    estimate,
                });
                self.publish(Arc::clone(&submission));
                info!(seq, total = submission.estimate.totals.final_rub, "estimate received");
                Ok(submission)
            }
            Err(e) => {
                warn!(seq, "submission failed: {}", e);
                Err(e)
            }
        }
    }

    /// Offer a result for display. Returns false if a newer one is already shown.
    pub fn publish(&self, submission: Arc<Submission>) -> bool {
        let seq = submission.seq;
        let previous = self.latest.rcu(|current| match current {
            Some(shown) if shown.seq > seq => Some(Arc::clone(shown)),
            _ => Some(Arc::clone(&submission)),
        });
        previous.is_none_or(|shown| shown.seq <= seq)
    }

    /// The estimate currently on display.
    pub fn latest(&self) -> Option<Arc<Submission>> {
        self.latest.load_full()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Submitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submitter")
            .field("in_flight", &self.is_in_flight())
            .field("next_seq", &self.next_seq.load(Ordering::Relaxed))
            .field("latest", &self.latest().map(|s| s.seq))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::estimate::{Construction, Dimensions, Openings, Totals};
    use async_trait::async_trait;

    fn estimate(final_rub: f64) -> Estimate {
        Estimate {
            dimensions: Dimensions {
                warm_area_m2: 36.0,
                terrace_area_m2: 0.0,
                porch_area_m2: 0.0,
                ceiling_height_m: 2.4,
                ceiling_type: "rafters".into(),
                ridge_delta_cm: 0,
                roof_overhang: "std".into(),
            },
            openings: Openings {
                standard_windows: vec![],
                doors: vec![],
                section_total_rub: 0.0,
            },
            construction: Construction {
                base_rub: final_rub,
                addons: vec![],
                delivery_rub: 0.0,
            },
            totals: Totals {
                subtotal_rub: final_rub,
                commission_rub: 0.0,
                final_rub,
            },
        }
    }

    struct Fixed(f64);

    #[async_trait]
    impl PricingService for Fixed {
        async fn calculate(&self, _payload: &Payload) -> Result<Estimate, SubmitError> {
            Ok(estimate(self.0))
        }
    }

    struct Refusing;

    #[async_trait]
    impl PricingService for Refusing {
        async fn calculate(&self, _payload: &Payload) -> Result<Estimate, SubmitError> {
            Err(SubmitError::RemoteUnavailable("connection refused".into()))
        }
    }

    fn submission(seq: u64, final_rub: f64) -> Arc<Submission> {
        let payload = normalize(&Configuration::default()).unwrap();
        Arc::new(Submission {
            seq,
            payload,
            estimate: estimate(final_rub),
        })
    }

    #[test]
    fn test_older_result_does_not_replace_newer() {
        let submitter = Submitter::new(Arc::new(Fixed(1.0)));
        assert!(submitter.publish(submission(2, 200.0)));
        assert!(!submitter.publish(submission(1, 100.0)));
        assert_eq!(submitter.latest().unwrap().seq, 2);

        assert!(submitter.publish(submission(3, 300.0)));
        assert_eq!(submitter.latest().unwrap().estimate.totals.final_rub, 300.0);
    }

    #[tokio::test]
    async fn test_submit_publishes_and_releases_slot() {
        let submitter = Submitter::new(Arc::new(Fixed(1_000.0)));
        let first = submitter
            .submit(Arc::new(Configuration::default()))
            .await
            .unwrap();
        assert_eq!(first.seq, 1);
        assert!(!submitter.is_in_flight());

        let second = submitter
            .submit(Arc::new(Configuration::default()))
            .await
            .unwrap();
        assert_eq!(second.seq, 2);
        assert_eq!(submitter.latest().unwrap().seq, 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_estimate() {
        let submitter = Submitter::new(Arc::new(Refusing));
        submitter.publish(submission(7, 700.0));

        let err = submitter
            .submit(Arc::new(Configuration::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitError::RemoteUnavailable(_)));
        assert_eq!(submitter.latest().unwrap().seq, 7);
        assert!(!submitter.is_in_flight());
    }
}
