//! Product catalog module.
//!
//! Contains the product, category and sub-category records and the
//! read-only [`Catalog`] store that queries run against.

mod category;
mod product;
mod store;

pub use category::{Category, SubCategory};
pub use product::Product;
pub use store::{Catalog, CatalogSeed};
