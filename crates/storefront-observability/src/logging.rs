//! Structured logging over `tracing-subscriber`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "STOREFRONT_LOG";

/// Minimum level for emitted logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trace => write!(f, "TRACE"),
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Output format for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format (for log aggregation).
    Json,
    /// Human-readable format (for development).
    #[default]
    Human,
}

/// The `[logging]` configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Raise the level to `debug` when `verbose` is set.
    pub fn with_verbosity(mut self, verbose: bool) -> Self {
        if verbose && self.level > LogLevel::Debug {
            self.level = LogLevel::Debug;
        }
        self
    }

    /// Filter directives: the override when present, otherwise the
    /// configured level for the storefront crates and `warn` elsewhere.
    pub fn filter_directives(&self, env_override: Option<&str>) -> String {
        match env_override.map(str::trim) {
            Some(directives) if !directives.is_empty() => directives.to_string(),
            _ => {
                let level = self.level.as_str();
                format!(
                    "warn,storefront={level},storefront_commerce={level},storefront_data={level}"
                )
            }
        }
    }
}

/// Error when installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Failed to install log subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `STOREFRONT_LOG` (same syntax as `RUST_LOG`) replaces the configured
/// level when set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_override = std::env::var(LOG_ENV_VAR).ok();
    let filter = EnvFilter::try_new(config.filter_directives(env_override.as_deref()))?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Human => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_config_deserializes_lowercase() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"level": "debug", "format": "json"}"#).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);

        let defaults: LoggingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, LoggingConfig::default());
    }

    #[test]
    fn test_verbose_raises_level_only() {
        let config = LoggingConfig::default().with_verbosity(true);
        assert_eq!(config.level, LogLevel::Debug);

        let trace = LoggingConfig {
            level: LogLevel::Trace,
            ..LoggingConfig::default()
        };
        assert_eq!(trace.with_verbosity(true).level, LogLevel::Trace);
    }

    #[test]
    fn test_filter_directives() {
        let config = LoggingConfig::default();
        assert_eq!(
            config.filter_directives(None),
            "warn,storefront=info,storefront_commerce=info,storefront_data=info"
        );
        assert_eq!(config.filter_directives(Some("trace")), "trace");
        assert_eq!(
            config.filter_directives(Some("  ")),
            config.filter_directives(None)
        );
        assert!(EnvFilter::try_new(config.filter_directives(None)).is_ok());
    }
}
