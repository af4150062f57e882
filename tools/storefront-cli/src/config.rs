//! Storefront configuration.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::money::Currency;
use storefront_commerce::search::DEFAULT_PAGE_SIZE;
use storefront_data::GatewayConfig;
use storefront_observability::LoggingConfig;

/// Storefront configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Query gateway timing.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StorefrontConfig {
    /// Load config from a file. `.json` files are JSON, anything else TOML.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))?
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.page_size < 1 {
            bail!("catalog.page_size must be at least 1, got {}", self.catalog.page_size);
        }
        if let Some(code) = &self.catalog.currency {
            if Currency::from_code(code).is_none() {
                bail!("Unknown currency in catalog.currency: {}", code);
            }
        }
        Ok(())
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Seed file path; the bundled sample catalog when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,

    /// Page size used when a query does not set one.
    #[serde(default = "default_page_size")]
    pub page_size: i64,

    /// Currency the seed must be priced in (ISO code).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed: None,
            page_size: default_page_size(),
            currency: None,
        }
    }
}

impl CatalogConfig {
    pub fn expected_currency(&self) -> Option<Currency> {
        self.currency.as_deref().and_then(Currency::from_code)
    }

    pub fn seed_path(&self) -> Option<&Path> {
        self.seed.as_deref().map(Path::new)
    }
}

/// Generate a default storefront.toml config file.
pub fn generate_default_config() -> String {
    r#"# Storefront configuration

[gateway]
# Simulated latency before each query reaches the catalog.
latency_ms = 500
attempt_timeout_ms = 2000
total_timeout_ms = 10000
max_retries = 2
backoff_base_ms = 100
backoff_max_ms = 1000

[catalog]
# seed = "data/catalog.json"
page_size = 10
# currency = "XOF"

[logging]
# trace, debug, info, warn, error. STOREFRONT_LOG overrides.
level = "info"
# human or json
format = "human"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_observability::{LogFormat, LogLevel};

    #[test]
    fn test_default_config_file_parses() {
        let config: StorefrontConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, StorefrontConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config: StorefrontConfig = toml::from_str(
            r#"
            [gateway]
            latency_ms = 0

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.gateway.latency_ms, 0);
        assert_eq!(config.gateway.max_retries, 2);
        assert_eq!(config.catalog.page_size, 10);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_json_config() {
        let config: StorefrontConfig =
            serde_json::from_str(r#"{"catalog": {"seed": "seed.json", "currency": "XOF"}}"#)
                .unwrap();
        assert_eq!(config.catalog.seed_path(), Some(Path::new("seed.json")));
        assert_eq!(config.catalog.expected_currency(), Some(Currency::XOF));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = StorefrontConfig::default();
        config.catalog.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.catalog.currency = Some("ZZZ".to_string());
        assert!(config.validate().is_err());
    }
}
