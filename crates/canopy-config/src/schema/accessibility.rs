//! Accessibility configuration types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessibilityConfig {
    /// Answer accessibility-object requests with the remote page tree.
    pub renderer_accessible: bool,
    /// Id of the root accessible object. Kept clear of the ids the
    /// platform reserves for its own objects.
    pub root_id: i32,
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        Self {
            renderer_accessible: false,
            root_id: 1000,
        }
    }
}
