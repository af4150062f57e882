//! Observability setup for the storefront.
//!
//! This crate provides:
//! - `LogLevel` / `LogFormat` - Serializable logging knobs
//! - `LoggingConfig` - The `[logging]` configuration section
//! - `init_logging` - Installs the global `tracing` subscriber

mod logging;

pub use logging::*;
