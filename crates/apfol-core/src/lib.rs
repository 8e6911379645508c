//! Configuration and telemetry shared by the Apfol crates.
//!
//! - [`config`]: the `apfol.toml` file plus environment overrides
//! - [`telemetry`]: tracing subscriber setup

pub mod config;
mod error;
pub mod telemetry;

pub use config::{AppConfig, CatalogConfig, LoggingConfig, StorageConfig, StorefrontConfig};
pub use error::ConfigError;
pub use telemetry::{LogFormat, LogLevel};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::error::ConfigError;
    pub use crate::telemetry::{LogFormat, LogLevel};
}
