//! Configuration type definitions.

use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Where and how estimate requests are sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// URL the payload is POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-exchange timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8000/calculate".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Session API listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default port for the session API.
pub const DEFAULT_PORT: u16 = 31995;

fn default_port() -> u16 {
    DEFAULT_PORT
}
