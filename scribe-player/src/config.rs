//! Configuration for the scribe-player
//!
//! Bootstrap settings come from a TOML file located by
//! `scribe_common::config::resolve_config_file` (CLI argument → `SCRIBE_CONFIG`
//! → platform config dir). A missing file is not an error: built-in defaults
//! apply. Command-line overrides are layered on by the binary.

use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use scribe_common::config::{load_toml, resolve_config_file, CONFIG_ENV_VAR};

use crate::error::{Error, Result};

/// Player configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base URL of the ASR backend API; audio lives at `{base}/audio/{result_id}`
    pub api_base_url: String,

    /// Event bus channel capacity
    pub event_capacity: usize,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "/api".to_string(),
            event_capacity: 100,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PlayerConfig {
    /// Resolve, read and validate the config file, or fall back to defaults
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let path = resolve_config_file(cli_path, CONFIG_ENV_VAR)
            .map_err(|e| Error::Config(e.to_string()))?;
        let config = match path {
            Some(path) => {
                info!("Reading configuration from {}", path.display());
                load_toml::<PlayerConfig>(&path).map_err(|e| Error::Config(e.to_string()))?
            }
            None => {
                warn!("No configuration file found, using built-in defaults");
                PlayerConfig::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PlayerConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.event_capacity == 0 {
            return Err(Error::Config("event_capacity must be at least 1".to_string()));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(Error::Config("api_base_url must not be empty".to_string()));
        }
        Ok(())
    }

    /// Audio URL for a backend result
    pub fn audio_url(&self, result_id: &str) -> String {
        format!("{}/audio/{}", self.api_base_url.trim_end_matches('/'), result_id)
    }
}
