//! Player configuration
//!
//! Values come from a JSON file, from `SHIORI_*` environment variables, or
//! from defaults. Command-line flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_ASSET_ROOT: &str = "SHIORI_ASSET_ROOT";
pub const ENV_LOG: &str = "SHIORI_LOG";
pub const ENV_DEBUG: &str = "SHIORI_DEBUG";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value '{value}' for {name}")]
    InvalidValue { name: String, value: String },
}

/// Settings for the console player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Directory that relative asset paths are resolved against
    pub asset_root: PathBuf,
    /// `env_logger` filter, e.g. `warn` or `shiori=debug`
    pub log_filter: String,
    /// Print interpreter state after every step
    pub debug: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("."),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            debug: false,
        }
    }
}

impl PlayerConfig {
    /// Defaults overridden by `SHIORI_ASSET_ROOT`, `SHIORI_LOG` and `SHIORI_DEBUG`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Read a JSON config file; absent fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply variables returned by `lookup` on top of `self`
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_ASSET_ROOT).filter(|v| !v.is_empty()) {
            self.asset_root = PathBuf::from(root);
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|v| !v.is_empty()) {
            self.log_filter = filter;
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            self.debug = parse_flag(ENV_DEBUG, &debug)?;
        }
        Ok(self)
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
