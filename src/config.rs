//! Client Configuration
//!
//! Connection and retry settings for the HTTP invoker.

use serde::{Deserialize, Serialize};

/// Placeholder in [`ClientConfig::endpoint`] replaced with the stack prefix
pub const PREFIX_PLACEHOLDER: &str = "{prefix}";

/// HTTP invoker settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the API; may contain `{prefix}`
    pub endpoint: String,
    /// Attempts per request, including the first
    pub max_attempts: u32,
    /// Delay before the first retry, doubled after each failure
    pub initial_backoff_ms: u64,
    /// Per-attempt timeout
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5001".to_string(),
            max_attempts: 4,
            initial_backoff_ms: 1000,
            timeout_secs: 30,
            user_agent: format!("cumulus-cli/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    /// Base URL for a given stack
    pub fn endpoint_for(&self, prefix: &str) -> String {
        self.endpoint
            .replace(PREFIX_PLACEHOLDER, prefix)
            .trim_end_matches('/')
            .to_string()
    }

    /// Attempt count, never below one
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
