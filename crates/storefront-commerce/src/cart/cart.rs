//! Cart and cart item types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::{CartId, ProductId};
use crate::money::{Currency, Money};

/// A product in the cart with its quantity.
///
/// The product is a snapshot taken when it was first added: later catalog
/// changes (e.g. a price update) do not reach items already in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product as it was at add time.
    pub product: Product,
    /// Always at least 1.
    pub quantity: i64,
}

impl CartItem {
    /// `price * quantity`; `None` on overflow, which no item held by a
    /// [`Cart`] reaches.
    pub fn line_total(&self) -> Option<Money> {
        self.product.price.try_multiply(self.quantity)
    }
}

/// A shopping cart.
///
/// Invariants kept by every command: no item has quantity below 1, at most
/// one item per product id, items stay in first-insertion order, and both
/// the money total and the unit count fit in an `i64`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    /// Unique cart identifier.
    pub id: CartId,
    currency: Currency,
    items: Vec<CartItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        let now = Utc::now();
        Self {
            id: CartId::generate(),
            currency,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// Merges into the existing item for the same product id, otherwise
    /// appends. Stock is not checked here. Returns the item's new quantity.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> Result<i64, CommerceError> {
        if quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        if product.price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: product.price.currency.code().to_string(),
            });
        }

        let current = self.get(&product.id).map_or(0, |item| item.quantity);
        let new_quantity = current
            .checked_add(quantity)
            .ok_or(CommerceError::Overflow)?;
        self.check_totals_with(&product.id, product.price, new_quantity)?;

        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(existing) => existing.quantity = new_quantity,
            None => self.items.push(CartItem {
                product: product.clone(),
                quantity: new_quantity,
            }),
        }
        self.touch();
        Ok(new_quantity)
    }

    /// Remove the item for `product_id`. Returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product.id != product_id);
        let removed = self.items.len() < len_before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Replace the quantity of an existing item.
    ///
    /// `quantity <= 0` removes the item. A product not in the cart is left
    /// out (no item is created). Returns whether the cart changed.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        let Some(price) = self.get(product_id).map(|item| item.product.price) else {
            return Ok(false);
        };
        self.check_totals_with(product_id, price, quantity)?;

        match self.items.iter_mut().find(|i| &i.product.id == product_id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                self.touch();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Empty the cart. Returns whether it held anything.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        self.touch();
        had_items
    }

    /// Sum of `price * quantity` over all items.
    ///
    /// Commands keep this within `i64`. A cart deserialized from
    /// out-of-range data reports `i64::MAX`.
    pub fn total(&self) -> Money {
        sum_lines(self.items.iter(), self.currency)
            .unwrap_or_else(|| Money::new(i64::MAX, self.currency))
    }

    /// Total units across all items.
    pub fn item_count(&self) -> i64 {
        sum_quantities(self.items.iter(), 0).unwrap_or(i64::MAX)
    }

    /// Number of distinct products.
    pub fn distinct_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product.id == product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Units of `product` that can still be added without exceeding its
    /// stock, for callers that clamp before adding.
    pub fn remaining_stock(&self, product: &Product) -> i64 {
        let in_cart = self.get(&product.id).map_or(0, |i| i.quantity);
        (product.stock - in_cart).max(0)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Fail with `Overflow` if setting `product_id` to `quantity` units at
    /// `price` would push the line total, the cart total or the unit count
    /// past `i64`.
    fn check_totals_with(
        &self,
        product_id: &ProductId,
        price: Money,
        quantity: i64,
    ) -> Result<(), CommerceError> {
        let line = price.try_multiply(quantity).ok_or(CommerceError::Overflow)?;
        let others = sum_lines(self.others(product_id), self.currency)
            .ok_or(CommerceError::Overflow)?;
        others.try_add(&line).ok_or(CommerceError::Overflow)?;
        sum_quantities(self.others(product_id), quantity).ok_or(CommerceError::Overflow)?;
        Ok(())
    }

    fn others<'a>(&'a self, product_id: &'a ProductId) -> impl Iterator<Item = &'a CartItem> + 'a {
        self.items.iter().filter(move |i| &i.product.id != product_id)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

fn sum_lines<'a>(items: impl Iterator<Item = &'a CartItem>, currency: Currency) -> Option<Money> {
    let lines = items.map(CartItem::line_total).collect::<Option<Vec<_>>>()?;
    Money::try_sum(lines, currency)
}

fn sum_quantities<'a>(mut items: impl Iterator<Item = &'a CartItem>, start: i64) -> Option<i64> {
    items.try_fold(start, |acc, item| acc.checked_add(item.quantity))
}
