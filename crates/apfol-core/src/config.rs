//! Storefront configuration.
//!
//! Settings come from an optional `apfol.toml` (or `.json`) file and are
//! then overridden by environment variables. Empty values count as unset.

use crate::telemetry::{LogFormat, LogLevel};
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names searched for by [`AppConfig::discover`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["apfol.toml", ".apfol.toml", "apfol.json"];

/// Name of the storage file inside the data directory.
pub const STORAGE_FILE_NAME: &str = "storage.json";

pub const ENV_STORE_DOMAIN: &str = "SHOPIFY_STORE_DOMAIN";
pub const ENV_ACCESS_TOKEN: &str = "SHOPIFY_STOREFRONT_ACCESS_TOKEN";
pub const ENV_API_VERSION: &str = "SHOPIFY_API_VERSION";
pub const ENV_WATCHINTOSH_VARIANT: &str = "WATCHINTOSH_VARIANT_ID";
pub const ENV_WATCHTRAINER_VARIANT: &str = "WATCHTRAINER_VARIANT_ID";
pub const ENV_DATA_DIR: &str = "APFOL_DATA_DIR";
pub const ENV_LOG: &str = "APFOL_LOG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storefront: StorefrontConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Commerce platform connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Store domain, e.g. `apfol.myshopify.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Public Storefront API access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Total request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries for read-only queries. Mutations are never retried.
    #[serde(default)]
    pub max_retries: u32,
}

fn default_api_version() -> String {
    "2024-01".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            domain: None,
            access_token: None,
            api_version: default_api_version(),
            timeout_ms: default_timeout_ms(),
            max_retries: 0,
        }
    }
}

impl StorefrontConfig {
    /// Domain and token, when both are present and non-empty.
    ///
    /// `None` means the storefront runs in local mode.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let domain = non_empty(self.domain.as_deref())?;
        let token = non_empty(self.access_token.as_deref())?;
        Some((domain, token))
    }

    /// Configured domain, even without a token.
    pub fn domain(&self) -> Option<&str> {
        non_empty(self.domain.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Variant ids for the built-in products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watchintosh_variant_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watchtrainer_variant_id: Option<String>,
}

/// Where persistent state lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured directory, or `$HOME/.local/share/apfol`.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        match std::env::var_os("HOME") {
            Some(home) if !home.is_empty() => {
                PathBuf::from(home).join(".local").join("share").join("apfol")
            }
            _ => PathBuf::from(".apfol"),
        }
    }

    /// Full path of the storage file.
    pub fn storage_file(&self) -> PathBuf {
        self.data_dir().join(STORAGE_FILE_NAME)
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Load config from a file. `.json` files are JSON, everything else TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if is_json(path) {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find a config file in `start` or any of its ancestors.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_FILE_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Load `path` if given, else a discovered file, else defaults; then
    /// apply environment overrides.
    pub fn resolve(path: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => match Self::discover(cwd) {
                Some(found) => Self::load(&found)?,
                None => Self::default(),
            },
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(domain) = get(ENV_STORE_DOMAIN) {
            self.storefront.domain = Some(domain);
        }
        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.storefront.access_token = Some(token);
        }
        if let Some(version) = get(ENV_API_VERSION) {
            self.storefront.api_version = version;
        }
        if let Some(id) = get(ENV_WATCHINTOSH_VARIANT) {
            self.catalog.watchintosh_variant_id = Some(id);
        }
        if let Some(id) = get(ENV_WATCHTRAINER_VARIANT) {
            self.catalog.watchtrainer_variant_id = Some(id);
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = get(ENV_LOG) {
            self.logging.level = level.parse()?;
        }
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.storefront.api_version, "2024-01");
        assert_eq!(config.storefront.timeout_ms, 10_000);
        assert_eq!(config.storefront.max_retries, 0);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(config.storefront.credentials().is_none());
    }

    #[test]
    fn test_credentials_require_both_values() {
        let mut storefront = StorefrontConfig {
            domain: Some("apfol.myshopify.com".into()),
            ..Default::default()
        };
        assert!(storefront.credentials().is_none());
        assert_eq!(storefront.domain(), Some("apfol.myshopify.com"));

        storefront.access_token = Some("  ".into());
        assert!(storefront.credentials().is_none());

        storefront.access_token = Some("tok".into());
        assert_eq!(
            storefront.credentials(),
            Some(("apfol.myshopify.com", "tok"))
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(env(&[
                (ENV_STORE_DOMAIN, "apfol.myshopify.com"),
                (ENV_ACCESS_TOKEN, "tok"),
                (ENV_WATCHINTOSH_VARIANT, "gid://shopify/ProductVariant/1"),
                (ENV_WATCHTRAINER_VARIANT, ""),
                (ENV_DATA_DIR, "/tmp/apfol"),
                (ENV_LOG, "debug"),
            ]))
            .unwrap();

        assert!(config.storefront.credentials().is_some());
        assert_eq!(
            config.catalog.watchintosh_variant_id.as_deref(),
            Some("gid://shopify/ProductVariant/1")
        );
        assert_eq!(config.catalog.watchtrainer_variant_id, None);
        assert_eq!(
            config.storage.storage_file(),
            PathBuf::from("/tmp/apfol/storage.json")
        );
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_log_level_override() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(env(&[(ENV_LOG, "chatty")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apfol.toml");
        let mut config = AppConfig::default();
        config.storefront.domain = Some("apfol.myshopify.com".into());
        config.logging.format = LogFormat::Json;

        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apfol.toml");
        std::fs::write(&path, "[storefront]\ndomain = \"x.myshopify.com\"\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.storefront.domain.as_deref(), Some("x.myshopify.com"));
        assert_eq!(config.storefront.api_version, "2024-01");
    }

    #[test]
    fn test_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apfol.json");
        std::fs::write(&path, r#"{"logging": {"level": "info", "format": "json"}}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".apfol.toml"), "").unwrap();

        assert_eq!(
            AppConfig::discover(&nested),
            Some(dir.path().join(".apfol.toml"))
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = AppConfig::load(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
