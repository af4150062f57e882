//! Asynchronous access to the storefront catalog.
//!
//! This crate provides:
//! - `QueryGateway` - Latest-wins, cancellable catalog queries with timeout/retry
//! - `CatalogSource` - What the gateway queries (in-memory by default)
//! - `RetryPolicy` / `TimeoutConfig` - Retry and timeout strategies
//! - `GatewayConfig` - The `[gateway]` configuration section
//! - `Storefront` - Session facade over catalog, gateway and cart

mod cancel;
mod config;
mod error;
mod gateway;
mod retry;
mod service;
mod source;
mod timeout;

pub use cancel::*;
pub use config::*;
pub use error::*;
pub use gateway::*;
pub use retry::*;
pub use service::*;
pub use source::*;
pub use timeout::*;
