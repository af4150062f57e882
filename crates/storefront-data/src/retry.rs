//! Retry policies for catalog source calls.

use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;
use crate::timeout::TimeoutConfig;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Exponential backoff with base and max.
    Exponential {
        /// Initial delay.
        base: Duration,
        /// Maximum delay.
        max: Duration,
    },
}

impl BackoffStrategy {
    /// Calculate delay for a given retry number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Exponential { base, max } => {
                let multiplier = 2u32.saturating_pow(attempt);
                base.saturating_mul(multiplier).min(*max)
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(50),
            max: Duration::from_millis(500),
        }
    }
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Backoff strategy.
    pub backoff: BackoffStrategy,
}

impl RetryPolicy {
    /// Create a new retry policy.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: BackoffStrategy::default(),
        }
    }

    /// Create a policy with no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: BackoffStrategy::None,
        }
    }

    /// Set backoff strategy.
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff = strategy;
        self
    }

    /// Check if `err` on retry number `attempt` (0-indexed) earns another
    /// try. Only transient errors are retried.
    pub fn should_retry(&self, err: &SourceError, attempt: u32) -> bool {
        attempt < self.max_retries && err.is_transient()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Run `operation` under `timeout`, retrying per `policy`.
///
/// Each attempt is bounded by `timeout.attempt`. On failure returns the last
/// error together with the number of attempts made.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    timeout: &TimeoutConfig,
    mut operation: F,
) -> Result<T, (SourceError, u32)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut retry = 0u32;
    loop {
        let result = match tokio::time::timeout(timeout.attempt, operation()).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(timeout.attempt)),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !policy.should_retry(&err, retry) {
                    return Err((err, retry + 1));
                }
                let delay = policy.backoff.delay_for_attempt(retry);
                retry += 1;
                tracing::warn!(
                    attempt = retry,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "catalog source failed, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
