//! Product records.

use crate::ids::{CategoryId, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique, stable product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Selling price.
    pub price: Money,
    /// Units available.
    #[serde(default)]
    pub stock: i64,
    /// Owning category.
    pub category_id: CategoryId,
    /// Image URIs, in display order.
    #[serde(default)]
    pub images: Vec<String>,
    /// Price before discount, for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
}

impl Product {
    /// Create a product with no description, images or original price.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        stock: i64,
        category_id: impl Into<CategoryId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            stock,
            category_id: category_id.into(),
            images: Vec::new(),
            original_price: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_original_price(mut self, original_price: Money) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// Check if at least one unit is available.
    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Check if the product is discounted against its original price.
    pub fn is_on_sale(&self) -> bool {
        self.original_price
            .and_then(|op| op.cmp_amount(&self.price))
            .is_some_and(|ord| ord.is_gt())
    }

    /// Discount percentage relative to the original price, if on sale.
    pub fn discount_percentage(&self) -> Option<f64> {
        if !self.is_on_sale() {
            return None;
        }
        self.original_price.map(|op| {
            let savings = op.amount - self.price.amount;
            (savings as f64 / op.amount as f64) * 100.0
        })
    }

    /// Main image, if any.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Check the record invariants (`price >= 0`, `stock >= 0`).
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.price.is_negative() {
            return Err(format!("product {} has negative price", self.id));
        }
        if self.stock < 0 {
            return Err(format!("product {} has negative stock", self.id));
        }
        Ok(())
    }
}
