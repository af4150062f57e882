//! Catalog sources the gateway queries through.

use std::sync::Arc;

use async_trait::async_trait;
use storefront_commerce::catalog::{Catalog, Product};
use storefront_commerce::search::{self, FilterCriteria, Page};

use crate::error::SourceError;

/// Something that can answer catalog queries.
///
/// The gateway owns latency, timeouts and retries; a source only answers
/// one attempt at a time.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Run one attempt of `criteria`.
    async fn query(&self, criteria: &FilterCriteria) -> Result<Page<Product>, SourceError>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "catalog"
    }
}

/// Runs the query engine over an in-memory catalog. Never fails.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    catalog: Arc<Catalog>,
}

impl InMemorySource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

#[async_trait]
impl CatalogSource for InMemorySource {
    async fn query(&self, criteria: &FilterCriteria) -> Result<Page<Product>, SourceError> {
        Ok(search::query(&self.catalog, criteria))
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
