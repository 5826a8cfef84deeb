//! Tooltip configuration types.

use serde::{Deserialize, Serialize};

/// Limits applied to the native tooltip control.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    /// Maximum tooltip length in characters; longer text is truncated.
    pub max_length: usize,
    /// Tooltips wrap after this width in pixels.
    pub max_width_px: u32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            max_length: 1024,
            max_width_px: 300,
        }
    }
}
