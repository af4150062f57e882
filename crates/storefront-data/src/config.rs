//! Gateway configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::{BackoffStrategy, RetryPolicy};
use crate::timeout::TimeoutConfig;

/// The `[gateway]` section of the storefront configuration.
///
/// Durations are whole milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Simulated latency before each query reaches the source.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    #[serde(default = "default_total_timeout_ms")]
    pub total_timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

fn default_latency_ms() -> u64 {
    500
}

fn default_attempt_timeout_ms() -> u64 {
    2_000
}

fn default_total_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff_base_ms() -> u64 {
    100
}

fn default_backoff_max_ms() -> u64 {
    1_000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            total_timeout_ms: default_total_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

impl GatewayConfig {
    /// No latency, no retries. Handy for tests and scripted runs.
    pub fn immediate() -> Self {
        Self {
            latency_ms: 0,
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn timeout(&self) -> TimeoutConfig {
        TimeoutConfig::new(
            Duration::from_millis(self.attempt_timeout_ms),
            Duration::from_millis(self.total_timeout_ms),
        )
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let backoff = if self.backoff_base_ms == 0 {
            BackoffStrategy::None
        } else {
            BackoffStrategy::Exponential {
                base: Duration::from_millis(self.backoff_base_ms),
                max: Duration::from_millis(self.backoff_max_ms.max(self.backoff_base_ms)),
            }
        };
        RetryPolicy::new(self.max_retries).with_backoff(backoff)
    }
}
