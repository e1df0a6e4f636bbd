//! HTTP client for the pricing service.
//!
//! One blocking POST per submission, run on tokio's blocking pool. HTTP
//! errors are not turned into transport errors so that a 4xx body can be
//! read and passed on to the user.

use super::PricingService;
use super::estimate::Estimate;
use crate::config::PricingConfig;
use crate::error::SubmitError;
use crate::normalize::Payload;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use ureq::Agent;

/// Pricing service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPricingService {
    agent: Agent,
    endpoint: String,
}

impl HttpPricingService {
    pub fn new(config: &PricingConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            endpoint: config.endpoint.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Perform the exchange and classify the outcome.
fn exchange(agent: &Agent, endpoint: &str, payload: &Payload) -> Result<Estimate, SubmitError> {
    let mut response = agent
        .post(endpoint)
        .send_json(payload)
        .map_err(|e| SubmitError::RemoteUnavailable(e.to_string()))?;

    let status = response.status().as_u16();
    debug!(status, "pricing service responded");

    match status {
        200..=299 => response
            .body_mut()
            .read_json::<Estimate>()
            .map_err(|e| SubmitError::RemoteUnavailable(format!("unreadable response: {}", e))),
        400..=499 => {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            Err(SubmitError::RemoteValidationRejected {
                status,
                messages: rejection_messages(status, &body),
            })
        }
        _ => Err(SubmitError::RemoteUnavailable(format!("HTTP {}", status))),
    }
}

/// Extract field-level messages from a rejection body.
///
/// Understands `{"detail": [{"loc": [...], "msg": "..."}]}` and
/// `{"detail": "..."}`; anything else is passed on as raw text.
pub fn rejection_messages(status: u16, body: &str) -> Vec<String> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    match parsed.as_ref().and_then(|v| v.get("detail")) {
        Some(Value::Array(items)) => items.iter().map(detail_message).collect(),
        Some(Value::String(message)) => vec![message.clone()],
        _ if !body.trim().is_empty() => vec![body.trim().to_string()],
        _ => vec![format!("HTTP {}", status)],
    }
}

fn detail_message(item: &Value) -> String {
    let msg = item
        .get("msg")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| item.to_string());

    let location: Vec<String> = item
        .get("loc")
        .and_then(Value::as_array)
        .map(|loc| {
            loc.iter()
                .filter(|part| part.as_str() != Some("body"))
                .map(|part| match part {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    if location.is_empty() {
        msg
    } else {
        format!("{}: {}", location.join("."), msg)
    }
}

#[async_trait]
impl PricingService for HttpPricingService {
    async fn calculate(&self, payload: &Payload) -> Result<Estimate, SubmitError> {
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        let payload = payload.clone();

        tokio::task::spawn_blocking(move || exchange(&agent, &endpoint, &payload))
            .await
            .map_err(|e| {
                warn!("pricing request task failed: {}", e);
                SubmitError::RemoteUnavailable(e.to_string())
            })?
    }
}
