//! Timeout configuration for gateway queries.

use std::time::Duration;

/// Timeouts applied to one gateway query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Bound on a single source call.
    pub attempt: Duration,
    /// Bound on the whole query, including latency, retries and backoff.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create a new timeout configuration.
    pub fn new(attempt: Duration, total: Duration) -> Self {
        Self { attempt, total }
    }

}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            attempt: Duration::from_millis(500),
            total: Duration::from_secs(2),
        }
    }
}
