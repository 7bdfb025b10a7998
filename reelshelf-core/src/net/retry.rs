use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Retry/backoff policy for rate-limited remote requests.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts made while the server keeps answering 429.
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    /// Growth factor applied to the delay after every 429.
    pub backoff_multiplier: f64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_backoff_ms: 1_000,
            backoff_multiplier: 1.5,
            max_backoff_ms: 3_000,
        }
    }
}

impl RetryConfig {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Delay to use after `current`, capped at [`Self::max_backoff`].
    pub fn next_backoff(&self, current: Duration) -> Duration {
        current
            .mul_f64(self.backoff_multiplier)
            .min(self.max_backoff())
    }
}
