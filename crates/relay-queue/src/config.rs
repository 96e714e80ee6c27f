//! Configuration for the queue path.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bounded wait for a response before falling back to the input.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Queue processor configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// How long a caller waits for a response before getting the
    /// unprocessed input back.
    #[serde(with = "humantime_serde")]
    pub response_timeout: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

impl QueueConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.response_timeout.as_millis() == 0 {
            return Err("response timeout cannot be 0".into());
        }
        Ok(())
    }
}
