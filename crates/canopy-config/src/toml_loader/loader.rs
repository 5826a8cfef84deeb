//! Core TOML config loading: read from a string, a path, or the platform default.

use crate::schema::ViewConfig;
use crate::validation;
use canopy_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::default_config_path;

/// Parse a TOML document, filling missing fields with defaults.
pub fn from_toml_str(content: &str) -> Result<ViewConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))
}

/// Load config from a specific TOML file path.
///
/// If validation fails, a warning is logged and the parsed config is
/// returned as-is.
pub fn load_from_path(path: &Path) -> Result<ViewConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config = from_toml_str(&content)?;

    if let Err(e) = validation::validate(&config) {
        warn!("config validation warning: {e}");
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path, or defaults if
/// no file exists there.
pub fn load_default() -> Result<ViewConfig, ConfigError> {
    let path = default_config_path()?;
    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!("no config found at {}, using defaults", path.display());
            Ok(ViewConfig::default())
        }
        Err(e) => Err(e),
    }
}
