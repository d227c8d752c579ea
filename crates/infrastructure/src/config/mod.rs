//! Runner settings loading.
//!
//! Settings come from a YAML or JSON file, with environment variables layered
//! on top.

mod env;
mod loader;

pub use env::{
    BODY_PREVIEW_LIMIT_VAR, DEFAULT_CONTENT_TYPE_VAR, LOG_BODIES_VAR, apply_env_overrides,
    settings_from_env,
};
pub use loader::{load_settings, parse_settings};

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON.
    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    /// The settings file is not valid YAML.
    #[error("invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension names no supported format.
    #[error("unsupported settings format: {0}")]
    UnsupportedFormat(String),

    /// An environment variable holds an unusable value.
    #[error("invalid value for {name}: '{value}'")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}
