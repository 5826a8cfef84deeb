//! Configuration validation.
//!
//! Collects every violation into a single `ConfigError`.

use crate::schema::ViewConfig;
use canopy_common::{Color, ConfigError};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ViewConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(
        &mut errors,
        "tooltip.max_length",
        config.tooltip.max_length as u64,
        1,
        65_536,
    );
    validate_range(
        &mut errors,
        "tooltip.max_width_px",
        config.tooltip.max_width_px as u64,
        16,
        4096,
    );
    validate_range(
        &mut errors,
        "plugins.registration_attempts",
        config.plugins.registration_attempts as u64,
        1,
        20,
    );
    validate_range(
        &mut errors,
        "plugins.registration_delay_ms",
        config.plugins.registration_delay_ms,
        0,
        10_000,
    );
    if Color::from_hex(&config.paint.background).is_none() {
        errors.push(format!(
            "paint.background = {:?} is not a hex color",
            config.paint.background
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Push an error if `value` is outside `[min, max]`.
fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}
