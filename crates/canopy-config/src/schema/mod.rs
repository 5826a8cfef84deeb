//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod accessibility;
mod logging;
mod paint;
mod plugins;
mod tooltip;

pub use accessibility::*;
pub use logging::*;
pub use paint::*;
pub use plugins::*;
pub use tooltip::*;

use serde::{Deserialize, Serialize};

/// Root configuration for a view controller process.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewConfig {
    pub tooltip: TooltipConfig,
    pub plugins: PluginConfig,
    pub paint: PaintConfig,
    pub accessibility: AccessibilityConfig,
    pub logging: LoggingConfig,
}
