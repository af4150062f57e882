//! Cart aggregator: the single owner of session cart state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::cart::{Cart, CartItem};
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::{CartId, ProductId};
use crate::money::{Currency, Money};

/// Aggregates published to cart subscribers after every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    /// Bumped once per state-changing command.
    pub revision: u64,
    pub distinct_items: usize,
    pub item_count: i64,
    pub total: Money,
}

/// Result of completing checkout on a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub cart_id: CartId,
    pub items: Vec<CartItem>,
    pub item_count: i64,
    pub total: Money,
    pub completed_at: DateTime<Utc>,
}

/// Owns a [`Cart`] and exposes its commands.
///
/// Commands take `&mut self` and run to completion, so no two of them ever
/// interleave. Aggregates are recomputed from the item list on every read.
/// Interested parties either poll [`revision`](Self::revision) or hold a
/// [`subscribe`](Self::subscribe) receiver.
#[derive(Debug)]
pub struct CartAggregator {
    cart: Cart,
    revision: u64,
    notifier: watch::Sender<CartSummary>,
}

impl CartAggregator {
    /// Start a session with an empty cart.
    pub fn new(currency: Currency) -> Self {
        let cart = Cart::new(currency);
        let (notifier, _) = watch::channel(summarize(&cart, 0));
        Self {
            cart,
            revision: 0,
            notifier,
        }
    }

    /// Add `quantity` units of `product`, merging with an existing item.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<(), CommerceError> {
        let new_quantity = self.cart.add_item(product, quantity)?;
        tracing::debug!(
            cart = %self.cart.id,
            product = %product.id,
            added = quantity,
            quantity = new_quantity,
            "cart item added"
        );
        self.publish();
        Ok(())
    }

    /// Add a single unit of `product`.
    pub fn add_one(&mut self, product: &Product) -> Result<(), CommerceError> {
        self.add_item(product, 1)
    }

    /// Remove the item for `product_id`; absent ids are ignored.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        if self.cart.remove_item(product_id) {
            tracing::debug!(cart = %self.cart.id, product = %product_id, "cart item removed");
            self.publish();
        }
    }

    /// Replace an item's quantity. `quantity <= 0` removes it; absent ids
    /// are ignored.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        if self.cart.set_quantity(product_id, quantity)? {
            tracing::debug!(cart = %self.cart.id, product = %product_id, quantity, "cart quantity set");
            self.publish();
        }
        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        if self.cart.clear() {
            tracing::debug!(cart = %self.cart.id, "cart cleared");
            self.publish();
        }
    }

    /// Complete checkout: hand back the final contents and empty the cart.
    pub fn checkout(&mut self) -> Result<CheckoutReceipt, CommerceError> {
        if self.cart.is_empty() {
            return Err(CommerceError::ValidationError(
                "cannot check out an empty cart".to_string(),
            ));
        }

        let receipt = CheckoutReceipt {
            cart_id: self.cart.id.clone(),
            items: self.cart.items().to_vec(),
            item_count: self.cart.item_count(),
            total: self.cart.total(),
            completed_at: Utc::now(),
        };
        self.cart.clear();
        tracing::info!(
            cart = %receipt.cart_id,
            items = receipt.item_count,
            total = %receipt.total,
            "checkout completed"
        );
        self.publish();
        Ok(receipt)
    }

    pub fn total(&self) -> Money {
        self.cart.total()
    }

    pub fn item_count(&self) -> i64 {
        self.cart.item_count()
    }

    pub fn distinct_count(&self) -> usize {
        self.cart.distinct_count()
    }

    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Number of state changes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current aggregates.
    pub fn summary(&self) -> CartSummary {
        summarize(&self.cart, self.revision)
    }

    /// Receive a fresh [`CartSummary`] after every change.
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.notifier.subscribe()
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.notifier.send_replace(summarize(&self.cart, self.revision));
    }
}

impl Default for CartAggregator {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

fn summarize(cart: &Cart, revision: u64) -> CartSummary {
    CartSummary {
        revision,
        distinct_items: cart.distinct_count(),
        item_count: cart.item_count(),
        total: cart.total(),
    }
}
