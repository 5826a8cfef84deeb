//! Plugin window embedding configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How cross-process plugin windows are embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Plugins run in their own processes. Intermediate windows are only
    /// inserted in this mode.
    pub out_of_process: bool,
    /// Total attempts to register an intermediate window with the plugin
    /// process registry before tearing it down (valid range: 1-20).
    pub registration_attempts: u32,
    /// Delay between registration attempts in milliseconds.
    pub registration_delay_ms: u64,
}

impl PluginConfig {
    pub fn registration_delay(&self) -> Duration {
        Duration::from_millis(self.registration_delay_ms)
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            out_of_process: true,
            registration_attempts: 5,
            registration_delay_ms: 200,
        }
    }
}
