//! Latest-wins asynchronous query gateway.
//!
//! Every [`QueryGateway::submit`] spawns its own task: wait out the
//! simulated latency, then call the [`CatalogSource`] under the
//! configured timeouts and retry policy. When the task finishes it settles
//! against the gateway's shared state:
//!
//! - a result whose sequence number is no longer the latest is dropped
//!   silently (`Superseded`), whatever it was;
//! - a cancelled latest query produces a `Cancelled` notice;
//! - otherwise the page (or the final error) is delivered.
//!
//! The check and the send to the delivery stream happen under one lock, so
//! a page for an older query can never reach the stream after a newer one.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use storefront_commerce::catalog::Product;
use storefront_commerce::search::{FilterCriteria, Page};
use tokio::sync::{mpsc, oneshot};

use crate::cancel::CancellationToken;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::source::CatalogSource;
use crate::timeout::TimeoutConfig;

/// Item on the gateway's delivery stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// Result of the latest query.
    Page { seq: u64, page: Page<Product> },
    /// The latest query was cancelled before its result was delivered.
    Cancelled { seq: u64 },
    /// The latest query failed after exhausting its retries.
    Failed { seq: u64, error: GatewayError },
}

impl Delivery {
    pub fn seq(&self) -> u64 {
        match self {
            Self::Page { seq, .. } | Self::Cancelled { seq } | Self::Failed { seq, .. } => *seq,
        }
    }
}

/// How a single query ended, as seen by its own handle.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Delivered(Page<Product>),
    /// A newer query was submitted before this one finished.
    Superseded,
    Cancelled,
    Failed(GatewayError),
}

impl QueryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }

    /// The delivered page, if any.
    pub fn into_page(self) -> Option<Page<Product>> {
        match self {
            Self::Delivered(page) => Some(page),
            _ => None,
        }
    }
}

/// Handle to one submitted query.
///
/// Dropping the handle does not cancel the query.
#[derive(Debug)]
pub struct QueryHandle {
    seq: u64,
    token: CancellationToken,
    outcome: oneshot::Receiver<QueryOutcome>,
}

impl QueryHandle {
    /// Sequence number assigned at submit time.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Prevent this query's result from being delivered. Other queries are
    /// unaffected.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A token that cancels this query when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Wait for the query to settle.
    pub async fn outcome(self) -> QueryOutcome {
        self.outcome
            .await
            .unwrap_or(QueryOutcome::Failed(GatewayError::Closed))
    }
}

#[derive(Debug, Default)]
struct State {
    latest: u64,
    in_flight: usize,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<State>,
    deliveries: Option<mpsc::UnboundedSender<Delivery>>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decide what a finished query produces. `result` is `None` when the
    /// task stopped early on cancellation.
    fn settle(
        &self,
        seq: u64,
        token: &CancellationToken,
        result: Option<Result<Page<Product>, GatewayError>>,
    ) -> QueryOutcome {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);

        if seq != state.latest {
            tracing::debug!(seq, latest = state.latest, "superseded result dropped");
            return QueryOutcome::Superseded;
        }

        let outcome = match result {
            _ if token.is_cancelled() => QueryOutcome::Cancelled,
            None => QueryOutcome::Cancelled,
            Some(Ok(page)) => QueryOutcome::Delivered(page),
            Some(Err(error)) => QueryOutcome::Failed(error),
        };

        let delivery = match &outcome {
            QueryOutcome::Delivered(page) => {
                tracing::debug!(seq, total_matching = page.total_matching, "query delivered");
                Delivery::Page {
                    seq,
                    page: page.clone(),
                }
            }
            QueryOutcome::Cancelled => {
                tracing::debug!(seq, "query cancelled");
                Delivery::Cancelled { seq }
            }
            QueryOutcome::Failed(error) => {
                tracing::warn!(seq, error = %error, "query failed");
                Delivery::Failed {
                    seq,
                    error: error.clone(),
                }
            }
            QueryOutcome::Superseded => return outcome,
        };

        if let Some(tx) = &self.deliveries {
            if tx.send(delivery).is_err() {
                tracing::trace!(seq, "delivery stream closed");
            }
        }
        outcome
    }
}

/// Issues catalog queries asynchronously and delivers only the latest.
///
/// Cloning yields another handle onto the same sequence and stream.
#[derive(Clone)]
pub struct QueryGateway {
    source: Arc<dyn CatalogSource>,
    latency: Duration,
    timeout: TimeoutConfig,
    retry: RetryPolicy,
    shared: Arc<Shared>,
}

impl QueryGateway {
    /// Gateway without a delivery stream; results are read from handles.
    pub fn new(source: Arc<dyn CatalogSource>, config: &GatewayConfig) -> Self {
        Self::build(source, config, None)
    }

    /// Gateway plus the receiving end of its delivery stream.
    pub fn with_delivery_stream(
        source: Arc<dyn CatalogSource>,
        config: &GatewayConfig,
    ) -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::build(source, config, Some(tx)), rx)
    }

    fn build(
        source: Arc<dyn CatalogSource>,
        config: &GatewayConfig,
        deliveries: Option<mpsc::UnboundedSender<Delivery>>,
    ) -> Self {
        Self {
            source,
            latency: config.latency(),
            timeout: config.timeout(),
            retry: config.retry_policy(),
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                deliveries,
            }),
        }
    }

    /// Issue `criteria`. Returns at once; must be called inside a tokio
    /// runtime.
    pub fn submit(&self, criteria: FilterCriteria) -> QueryHandle {
        let seq = {
            let mut state = self.shared.lock();
            state.latest += 1;
            state.in_flight += 1;
            state.latest
        };
        tracing::debug!(seq, source = self.source.name(), "query submitted");

        let token = CancellationToken::new();
        let (outcome_tx, outcome_rx) = oneshot::channel();

        let task_token = token.clone();
        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.shared);
        let latency = self.latency;
        let timeout = self.timeout;
        let retry = self.retry.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = task_token.cancelled() => None,
                result = run_query(source.as_ref(), &criteria, latency, &timeout, &retry) => Some(result),
            };
            let outcome = shared.settle(seq, &task_token, result);
            // The handle may already be gone.
            let _ = outcome_tx.send(outcome);
        });

        QueryHandle {
            seq,
            token,
            outcome: outcome_rx,
        }
    }

    /// Highest sequence number issued so far (0 before the first submit).
    pub fn latest_seq(&self) -> u64 {
        self.shared.lock().latest
    }

    /// Queries submitted but not yet settled.
    pub fn in_flight(&self) -> usize {
        self.shared.lock().in_flight
    }
}

async fn run_query(
    source: &dyn CatalogSource,
    criteria: &FilterCriteria,
    latency: Duration,
    timeout: &TimeoutConfig,
    retry: &RetryPolicy,
) -> Result<Page<Product>, GatewayError> {
    let attempts = AtomicU32::new(0);
    let counter = &attempts;
    let work = async move {
        tokio::time::sleep(latency).await;
        retry_with_backoff(retry, timeout, move || {
            counter.fetch_add(1, Ordering::Relaxed);
            source.query(criteria)
        })
        .await
    };

    match tokio::time::timeout(timeout.total, work).await {
        Ok(Ok(page)) => Ok(page),
        Ok(Err((error, attempts))) => Err(GatewayError::from_source(error, attempts)),
        Err(_) => Err(GatewayError::Timeout {
            attempts: attempts.load(Ordering::Relaxed),
        }),
    }
}
