//! Configuration for the multi-endpoint path.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Overall per-request timeout.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Connection establishment timeout.
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }
}

impl ClientConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout.as_millis() == 0 {
            return Err("request timeout cannot be 0".into());
        }
        if self.connect_timeout.as_millis() == 0 {
            return Err("connect timeout cannot be 0".into());
        }
        Ok(())
    }
}
