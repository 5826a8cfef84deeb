//! Paint configuration types.

use canopy_common::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    /// Fill color used where no backing store pixels exist (hex).
    pub background: String,
    /// Alpha of the black overlay drawn over deemphasized content.
    /// 178 is 70% grey.
    pub deemphasis_alpha: u8,
}

impl PaintConfig {
    /// Parsed background color; falls back to white on a bad value.
    pub fn background_color(&self) -> Color {
        Color::from_hex(&self.background).unwrap_or(Color::WHITE)
    }

    pub fn deemphasis_color(&self) -> Color {
        Color::from_argb(self.deemphasis_alpha, 0, 0, 0)
    }
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".into(),
            deemphasis_alpha: 178,
        }
    }
}
