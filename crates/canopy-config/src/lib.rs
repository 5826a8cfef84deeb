//! Canopy view configuration.
//!
//! TOML-based settings for the view controller: tooltip limits, plugin
//! window registration policy, paint colors, accessibility and logging.
//! Every section uses serde defaults so partial files work.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AccessibilityConfig, LogLevel, LoggingConfig, PaintConfig, PluginConfig, TooltipConfig,
    ViewConfig,
};
pub use toml_loader::{from_toml_str, load_default, load_from_path};

use canopy_common::ConfigError;

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<ViewConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &ViewConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
