//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading configuration or telemetry.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read or written.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML.
    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Config could not be rendered as TOML.
    #[error("Failed to render TOML config: {0}")]
    TomlRender(#[from] toml::ser::Error),

    /// Invalid JSON.
    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// A setting has an unusable value.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    /// The global tracing subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Telemetry(String),
}
