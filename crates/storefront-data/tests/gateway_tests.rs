//! Gateway delivery ordering, cancellation and failure handling.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use storefront_commerce::prelude::*;
use storefront_data::{
    CatalogSource, Delivery, GatewayConfig, GatewayError, QueryGateway, QueryOutcome, SourceError,
};
use tokio::sync::mpsc::error::TryRecvError;

fn catalog() -> Arc<Catalog> {
    let xof = |amount| Money::new(amount, Currency::XOF);
    Arc::new(
        Catalog::new(
            Currency::XOF,
            vec![
                Product::new("1", "Smartphone XYZ", xof(67000), 15, "1"),
                Product::new("3", "T-shirt Premium", xof(25000), 50, "2"),
            ],
            vec![],
            vec![],
        )
        .unwrap(),
    )
}

fn config() -> GatewayConfig {
    GatewayConfig {
        latency_ms: 0,
        ..GatewayConfig::default()
    }
}

/// Delays each query by the number of milliseconds in its search text. The
/// search text `fail` makes the query fail outright.
struct DelayedSource {
    catalog: Arc<Catalog>,
}

#[async_trait]
impl CatalogSource for DelayedSource {
    async fn query(&self, criteria: &FilterCriteria) -> Result<Page<Product>, SourceError> {
        if criteria.search_text == "fail" {
            return Err(SourceError::Source("boom".into()));
        }
        let delay: u64 = criteria.search_text.parse().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        // The search text is only a delay marker.
        let criteria = criteria.clone().with_search("");
        Ok(query(&self.catalog, &criteria))
    }
}

/// Fails with `error` for the first `failures` attempts, then answers.
struct FlakySource {
    catalog: Arc<Catalog>,
    failures: u32,
    error: SourceError,
    calls: AtomicU32,
}

impl FlakySource {
    fn new(failures: u32, error: SourceError) -> Self {
        Self {
            catalog: catalog(),
            failures,
            error,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl CatalogSource for FlakySource {
    async fn query(&self, criteria: &FilterCriteria) -> Result<Page<Product>, SourceError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(self.error.clone());
        }
        Ok(query(&self.catalog, criteria))
    }
}

/// Never answers within any reasonable timeout.
struct HangingSource;

#[async_trait]
impl CatalogSource for HangingSource {
    async fn query(&self, _criteria: &FilterCriteria) -> Result<Page<Product>, SourceError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(SourceError::Source("unreachable".into()))
    }
}

fn delayed() -> Arc<dyn CatalogSource> {
    Arc::new(DelayedSource { catalog: catalog() })
}

#[tokio::test(start_paused = true)]
async fn test_slow_older_query_never_delivered() {
    let (gateway, mut rx) = QueryGateway::with_delivery_stream(delayed(), &config());

    let q1 = gateway.submit(FilterCriteria::new().with_search("1000"));
    let q2 = gateway.submit(FilterCriteria::new().with_search("10"));

    // Q2 completes first and is delivered.
    let delivered = rx.recv().await.unwrap();
    assert_eq!(delivered.seq(), q2.seq());
    assert!(matches!(delivered, Delivery::Page { .. }));

    // Q1 completes later and is dropped.
    assert_eq!(q1.outcome().await, QueryOutcome::Superseded);
    assert!(q2.outcome().await.is_delivered());
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(gateway.in_flight(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_fast_older_query_is_dropped_while_newer_pending() {
    let (gateway, mut rx) = QueryGateway::with_delivery_stream(delayed(), &config());

    let q1 = gateway.submit(FilterCriteria::new().with_search("10"));
    let q2 = gateway.submit(FilterCriteria::new().with_search("1000"));

    assert_eq!(q1.outcome().await, QueryOutcome::Superseded);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(gateway.in_flight(), 1);

    assert!(q2.outcome().await.is_delivered());
    assert_eq!(rx.recv().await.map(|d| d.seq()), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_query_after_delivery_is_delivered_too() {
    let (gateway, mut rx) = QueryGateway::with_delivery_stream(delayed(), &config());

    assert!(gateway.submit(FilterCriteria::new()).outcome().await.is_delivered());
    assert!(gateway.submit(FilterCriteria::new()).outcome().await.is_delivered());

    assert_eq!(rx.recv().await.map(|d| d.seq()), Some(1));
    assert_eq!(rx.recv().await.map(|d| d.seq()), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_cancelling_older_query_leaves_newer_alone() {
    let (gateway, mut rx) = QueryGateway::with_delivery_stream(delayed(), &config());

    let q1 = gateway.submit(FilterCriteria::new().with_search("50"));
    let q2 = gateway.submit(FilterCriteria::new().with_search("50"));
    q1.cancel();

    assert_eq!(q1.outcome().await, QueryOutcome::Superseded);
    assert!(q2.outcome().await.is_delivered());
    assert!(matches!(rx.recv().await, Some(Delivery::Page { seq: 2, .. })));
}

#[tokio::test(start_paused = true)]
async fn test_cancelling_latest_query_stops_delivery() {
    let (gateway, mut rx) = QueryGateway::with_delivery_stream(delayed(), &config());

    let handle = gateway.submit(FilterCriteria::new().with_search("500"));
    let token = handle.cancellation_token();
    tokio::time::sleep(Duration::from_millis(100)).await;
    token.cancel();

    assert!(handle.is_cancelled());
    assert_eq!(handle.outcome().await, QueryOutcome::Cancelled);
    assert_eq!(rx.recv().await, Some(Delivery::Cancelled { seq: 1 }));
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn test_transient_failures_are_retried() {
    let source = Arc::new(FlakySource::new(2, SourceError::Unavailable("warming up".into())));
    let gateway = QueryGateway::new(source.clone(), &config());

    let page = gateway
        .submit(FilterCriteria::new())
        .outcome()
        .await
        .into_page()
        .unwrap();
    assert_eq!(page.total_matching, 2);
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_persistent_failure_delivers_failed_notice() {
    let source = Arc::new(FlakySource::new(u32::MAX, SourceError::Unavailable("down".into())));
    let (gateway, mut rx) = QueryGateway::with_delivery_stream(source.clone(), &config());

    let expected = GatewayError::Unavailable {
        attempts: 3,
        message: "down".into(),
    };
    assert_eq!(
        gateway.submit(FilterCriteria::new()).outcome().await,
        QueryOutcome::Failed(expected.clone())
    );
    assert_eq!(
        rx.recv().await,
        Some(Delivery::Failed {
            seq: 1,
            error: expected
        })
    );
    assert_eq!(source.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_non_transient_failure_is_not_retried() {
    let source = Arc::new(FlakySource::new(1, SourceError::Source("bad criteria".into())));
    let gateway = QueryGateway::new(source.clone(), &config());

    assert_eq!(
        gateway.submit(FilterCriteria::new()).outcome().await,
        QueryOutcome::Failed(GatewayError::Source("bad criteria".into()))
    );
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_attempt_timeouts_exhaust_retries() {
    let config = GatewayConfig {
        latency_ms: 0,
        attempt_timeout_ms: 100,
        max_retries: 1,
        ..GatewayConfig::default()
    };
    let gateway = QueryGateway::new(Arc::new(HangingSource), &config);

    assert_eq!(
        gateway.submit(FilterCriteria::new()).outcome().await,
        QueryOutcome::Failed(GatewayError::Timeout { attempts: 2 })
    );
}

#[tokio::test(start_paused = true)]
async fn test_total_timeout_bounds_query() {
    let config = GatewayConfig {
        latency_ms: 0,
        attempt_timeout_ms: 400,
        total_timeout_ms: 1_000,
        max_retries: 10,
        backoff_base_ms: 0,
        ..GatewayConfig::default()
    };
    let gateway = QueryGateway::new(Arc::new(HangingSource), &config);

    let started = tokio::time::Instant::now();
    let outcome = gateway.submit(FilterCriteria::new()).outcome().await;
    assert_eq!(outcome, QueryOutcome::Failed(GatewayError::Timeout { attempts: 3 }));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(1_000) && elapsed < Duration::from_millis(1_050));
}

#[tokio::test(start_paused = true)]
async fn test_superseded_failure_is_silent() {
    let (gateway, mut rx) = QueryGateway::with_delivery_stream(delayed(), &config());

    let q1 = gateway.submit(FilterCriteria::new().with_search("fail"));
    let q2 = gateway.submit(FilterCriteria::new().with_search("100"));

    assert_eq!(q1.outcome().await, QueryOutcome::Superseded);
    assert!(q2.outcome().await.is_delivered());
    assert!(matches!(rx.recv().await, Some(Delivery::Page { seq: 2, .. })));
}
