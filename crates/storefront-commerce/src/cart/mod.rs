//! Shopping cart module.
//!
//! [`Cart`] holds the items and enforces the merge/quantity invariants;
//! [`CartAggregator`] owns the session cart and notifies subscribers.

mod aggregator;
mod cart;

pub use aggregator::{CartAggregator, CartSummary, CheckoutReceipt};
pub use cart::{Cart, CartItem};
