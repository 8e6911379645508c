//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use apfol_cache::Cache;
use apfol_cart::{catalog_from_config, CartStore};
use apfol_commerce::catalog::Catalog;
use apfol_commerce::VariantId;
use apfol_core::AppConfig;

use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Resolved configuration, environment overrides applied.
    pub config: AppConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from the given or discovered config file.
    pub fn load(config_path: Option<&str>, data_dir: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(resolve_path(&cwd, path)),
            None => AppConfig::discover(&cwd),
        };

        let mut config = match &config_path {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => AppConfig::default(),
        };
        config
            .apply_env()
            .context("Invalid configuration in environment")?;

        if let Some(dir) = data_dir {
            config.storage.data_dir = Some(resolve_path(&cwd, dir));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Catalog with the configured variant ids.
    pub fn catalog(&self) -> Catalog {
        catalog_from_config(&self.config)
    }

    /// Variant id for a product handle, or the argument itself.
    pub fn variant_for(&self, handle_or_id: &str) -> VariantId {
        self.catalog()
            .by_handle(handle_or_id)
            .map(|product| product.variant_id.clone())
            .unwrap_or_else(|| VariantId::new(handle_or_id))
    }

    /// File-backed storage under the data directory.
    pub fn cache(&self) -> Result<Cache> {
        let path = self.config.storage.storage_file();
        self.output
            .debug(&format!("Using storage file {}", path.display()));
        Cache::open_file(&path)
            .with_context(|| format!("Failed to open storage at {}", path.display()))
    }

    /// Cart store for this session.
    pub fn cart_store(&self) -> Result<CartStore> {
        let cache = self.cache()?;
        CartStore::from_config(&self.config, cache).context("Failed to set up storefront client")
    }
}

/// Resolve a path relative to the working directory.
fn resolve_path(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
