//! The storefront service facade.
//!
//! One `Storefront` is one shopping session: a shared read-only catalog, a
//! query gateway over it and the session's cart.

use std::sync::Arc;
use std::time::Duration;

use storefront_commerce::cart::{CartAggregator, CartItem, CartSummary, CheckoutReceipt};
use storefront_commerce::catalog::{Catalog, Category, Product, SubCategory};
use storefront_commerce::error::CommerceError;
use storefront_commerce::ids::{CategoryId, ProductId};
use storefront_commerce::money::Money;
use storefront_commerce::search::{FilterCriteria, Page};
use tokio::sync::watch;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gateway::{QueryGateway, QueryOutcome};
use crate::source::{CatalogSource, InMemorySource};

/// Catalog browsing and cart operations for one session.
pub struct Storefront {
    catalog: Arc<Catalog>,
    gateway: QueryGateway,
    latency: Duration,
    cart: CartAggregator,
}

impl Storefront {
    /// Session over `catalog`, queried in memory.
    pub fn new(catalog: Arc<Catalog>, config: &GatewayConfig) -> Self {
        let source = Arc::new(InMemorySource::new(Arc::clone(&catalog)));
        Self::with_source(catalog, source, config)
    }

    /// Session whose product listings go through `source`. Lookups by id
    /// and category listings still read `catalog` directly.
    pub fn with_source(
        catalog: Arc<Catalog>,
        source: Arc<dyn CatalogSource>,
        config: &GatewayConfig,
    ) -> Self {
        let cart = CartAggregator::new(catalog.currency());
        tracing::info!(
            products = catalog.len(),
            categories = catalog.categories().len(),
            source = source.name(),
            "storefront session started"
        );
        Self {
            gateway: QueryGateway::new(source, config),
            latency: config.latency(),
            catalog,
            cart,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn gateway(&self) -> &QueryGateway {
        &self.gateway
    }

    /// List products matching `criteria`.
    ///
    /// `Ok(None)` means another listing was issued after this one (or it was
    /// cancelled) and its result was discarded.
    pub async fn list_products(
        &self,
        criteria: FilterCriteria,
    ) -> Result<Option<Page<Product>>, GatewayError> {
        match self.gateway.submit(criteria).outcome().await {
            QueryOutcome::Delivered(page) => Ok(Some(page)),
            QueryOutcome::Superseded | QueryOutcome::Cancelled => Ok(None),
            QueryOutcome::Failed(error) => Err(error),
        }
    }

    pub async fn get_product_by_id(&self, id: &ProductId) -> Option<Product> {
        self.simulate_latency().await;
        self.catalog.product(id).cloned()
    }

    pub async fn get_categories(&self) -> Vec<Category> {
        self.simulate_latency().await;
        self.catalog.categories().to_vec()
    }

    /// Sub-categories of `category_id`, or all of them when `None`.
    pub async fn get_sub_categories(&self, category_id: Option<&CategoryId>) -> Vec<SubCategory> {
        self.simulate_latency().await;
        self.catalog
            .sub_categories_of(category_id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Add `quantity` units (default 1) of `product` to the cart.
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        quantity: Option<i64>,
    ) -> Result<(), CommerceError> {
        self.cart.add_item(product, quantity.unwrap_or(1))
    }

    pub fn remove_from_cart(&mut self, id: &ProductId) {
        self.cart.remove_item(id);
    }

    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> Result<(), CommerceError> {
        self.cart.set_quantity(id, quantity)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    pub fn get_cart_total(&self) -> Money {
        self.cart.total()
    }

    pub fn get_cart_items_count(&self) -> i64 {
        self.cart.item_count()
    }

    pub fn cart_items(&self) -> &[CartItem] {
        self.cart.items()
    }

    pub fn cart(&self) -> &CartAggregator {
        &self.cart
    }

    pub fn subscribe_cart(&self) -> watch::Receiver<CartSummary> {
        self.cart.subscribe()
    }

    pub fn checkout(&mut self) -> Result<CheckoutReceipt, CommerceError> {
        self.cart.checkout()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
