//! Upstream API configuration: base URLs and API keys.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Base URLs and credentials for the upstream providers.
///
/// Defaults carry the public endpoints; keys come from the
/// `ALPHAVANTAGE_API_KEY` / `TIINGO_API_KEY` environment variables or a TOML
/// override file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub coingecko_base: String,
    pub alphavantage_base: String,
    pub tiingo_base: String,
    pub alphavantage_key: String,
    pub tiingo_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            coingecko_base: "https://api.coingecko.com/api/v3".into(),
            alphavantage_base: "https://www.alphavantage.co/query".into(),
            tiingo_base: "https://api.tiingo.com".into(),
            alphavantage_key: String::new(),
            tiingo_key: String::new(),
        }
    }
}

impl ApiConfig {
    /// Defaults plus API keys from the environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var("ALPHAVANTAGE_API_KEY") {
            config.alphavantage_key = key;
        }
        if let Ok(key) = std::env::var("TIINGO_API_KEY") {
            config.tiingo_key = key;
        }
        config
    }

    /// Load from a TOML file. Absent fields fall back to defaults.
    pub fn from_toml(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
