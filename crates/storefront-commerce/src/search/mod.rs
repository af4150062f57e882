//! Search module.
//!
//! Contains the filter criteria, the per-product filters derived from them,
//! paged results, and the query engine that ties them together.

mod criteria;
pub mod engine;
mod filter;
mod page;

pub use criteria::{FilterCriteria, SortKey, DEFAULT_PAGE_SIZE};
pub use engine::{count, query};
pub use filter::Filter;
pub use page::Page;
