//! Configuration file resolution and TOML loading
//!
//! Config file resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Platform user config file (`<config_dir>/scribe/config.toml`)
//! 4. None: caller falls back to built-in defaults
//!
//! A missing file at priority 3 is not an error. An explicitly named file
//! (priority 1 or 2) that does not exist is.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SCRIBE_CONFIG";

/// Application directory name under the platform config dir
const APP_DIR: &str = "scribe";

/// Resolve which config file to read, if any.
///
/// Returns `Ok(None)` when no explicit path was given and no user config file
/// exists.
pub fn resolve_config_file(cli_arg: Option<&Path>, env_var_name: &str) -> Result<Option<PathBuf>> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return require_exists(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return require_exists(PathBuf::from(path));
        }
    }

    // Priority 3: Platform user config file
    match default_config_path() {
        Some(path) if path.exists() => Ok(Some(path)),
        Some(path) => {
            debug!("No config file at {}, using defaults", path.display());
            Ok(None)
        }
        None => {
            warn!("Could not determine platform config directory, using defaults");
            Ok(None)
        }
    }
}

fn require_exists(path: PathBuf) -> Result<Option<PathBuf>> {
    if path.exists() {
        Ok(Some(path))
    } else {
        Err(Error::Config(format!("Config file not found: {}", path.display())))
    }
}

/// Platform default config file path (may not exist)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Read and deserialize a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    let value = toml::from_str(&content)?;
    debug!("Loaded configuration from {}", path.display());
    Ok(value)
}
