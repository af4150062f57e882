//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use storefront_commerce::catalog::Catalog;
use storefront_data::Storefront;

use crate::config::StorefrontConfig;
use crate::output::Output;

/// Sample catalog used when no seed file is configured.
const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration.
    pub config: StorefrontConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Where the configuration came from, if anywhere.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (StorefrontConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (StorefrontConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(StorefrontConfig, PathBuf)> {
        let config_names = ["storefront.toml", ".storefront.toml", "storefront.json"];

        let mut current = start.to_path_buf();
        loop {
            for name in &config_names {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = StorefrontConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Load the configured seed, or the bundled sample catalog.
    pub fn load_catalog(&self) -> Result<Arc<Catalog>> {
        let catalog = match self.config.catalog.seed_path() {
            Some(path) => {
                let path = self.resolve_path(path);
                self.output.debug(&format!("Loading catalog from {}", path.display()));
                Catalog::from_json_file(&path)
                    .with_context(|| format!("Failed to load catalog seed: {}", path.display()))?
            }
            None => {
                self.output.debug("Using bundled sample catalog");
                Catalog::from_json_str(BUNDLED_CATALOG)
                    .context("Failed to load bundled sample catalog")?
            }
        };

        if let Some(expected) = self.config.catalog.expected_currency() {
            if catalog.currency() != expected {
                bail!(
                    "Catalog is priced in {} but configuration expects {}",
                    catalog.currency(),
                    expected
                );
            }
        }

        Ok(Arc::new(catalog))
    }

    /// A fresh storefront session over the configured catalog.
    pub fn storefront(&self) -> Result<Storefront> {
        let catalog = self.load_catalog()?;
        Ok(Storefront::new(catalog, &self.config.gateway))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
