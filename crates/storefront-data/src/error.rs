//! Error types for catalog sources and the query gateway.

use std::time::Duration;

use thiserror::Error;

/// Error returned by a single [`CatalogSource`](crate::CatalogSource) call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The attempt did not finish within its timeout.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The source is temporarily unable to answer.
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// The source rejected the query; retrying will not help.
    #[error("Source error: {0}")]
    Source(String),
}

impl SourceError {
    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Unavailable(_))
    }
}

/// Final error for a gateway query, after any retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Query timed out after {attempts} attempt(s)")]
    Timeout { attempts: u32 },

    #[error("Catalog source unavailable after {attempts} attempt(s): {message}")]
    Unavailable { attempts: u32, message: String },

    #[error("Catalog source error: {0}")]
    Source(String),

    /// The gateway shut down before the query resolved.
    #[error("Query gateway closed")]
    Closed,
}

impl GatewayError {
    /// Map the last source error of a query that made `attempts` attempts.
    pub fn from_source(err: SourceError, attempts: u32) -> Self {
        match err {
            SourceError::Timeout(_) => Self::Timeout { attempts },
            SourceError::Unavailable(message) => Self::Unavailable { attempts, message },
            SourceError::Source(message) => Self::Source(message),
        }
    }
}
