use canopy_common::types::WindowId;
use serde::{Deserialize, Serialize};

/// Result of asking the plugin-process registry to adopt an intermediate
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// The owning process was found and now tracks the window.
    Registered,
    /// The owning process exists but is still starting; ask again later.
    ProcessStarting,
    /// No plugin process owns the plugin window.
    NoProcess,
}

/// Registry of running out-of-process plugin hosts.
pub trait PluginProcessRegistry {
    fn register_intermediate_window(
        &self,
        plugin: WindowId,
        intermediate: WindowId,
    ) -> RegistrationOutcome;
    /// Release whatever the registry holds for `intermediate` after a
    /// failed registration.
    fn teardown_intermediate_window(&self, intermediate: WindowId);
}
