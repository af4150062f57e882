//! Catalog, query engine and cart domain for the storefront.
//!
//! - **Catalog**: products, categories, sub-categories and the read-only
//!   [`Catalog`](catalog::Catalog) store
//! - **Search**: filter criteria, the pure query engine, paged results
//! - **Cart**: merge-by-identity cart and its session aggregator
//!
//! # Example
//!
//! ```
//! use storefront_commerce::prelude::*;
//!
//! let catalog = Catalog::new(
//!     Currency::XOF,
//!     vec![
//!         Product::new("1", "Smartphone XYZ", Money::new(67000, Currency::XOF), 15, "1"),
//!         Product::new("3", "T-shirt Premium", Money::new(25000, Currency::XOF), 50, "2"),
//!     ],
//!     vec![],
//!     vec![],
//! )
//! .unwrap();
//!
//! let page = query(&catalog, &FilterCriteria::new().with_search("shirt"));
//! assert_eq!(page.total_matching, 1);
//!
//! let mut cart = CartAggregator::new(Currency::XOF);
//! cart.add_item(&page.items[0], 2).unwrap();
//! assert_eq!(cart.total(), Money::new(50000, Currency::XOF));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Catalog, CatalogSeed, Category, Product, SubCategory};

    // Search
    pub use crate::search::{count, query, Filter, FilterCriteria, Page, SortKey};

    // Cart
    pub use crate::cart::{Cart, CartAggregator, CartItem, CartSummary, CheckoutReceipt};
}
