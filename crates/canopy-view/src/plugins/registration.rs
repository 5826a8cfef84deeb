//! Registering intermediate windows with the plugin process registry.
//!
//! The plugin process may still be starting when its window shows up, so
//! registration is retried a bounded number of times. When the budget runs
//! out, or no process owns the window, the plugin window is moved back
//! under the view and the intermediate is destroyed instead of leaking.

use canopy_common::types::WindowId;
use canopy_platform::{PluginProcessRegistry, RegistrationOutcome, WindowSystem};
use tracing::{debug, warn};

use super::PluginWindowEmbedder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// The view the plugin window sits in.
    pub view: WindowId,
    pub plugin: WindowId,
    pub intermediate: WindowId,
    /// Attempts remaining, including the one about to run.
    pub attempts_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    Registered,
    /// Ask again after the configured delay.
    Retry(RegistrationRequest),
    TornDown,
    /// The intermediate window was already gone.
    Abandoned,
}

pub(super) fn run(
    embedder: &mut PluginWindowEmbedder,
    windows: &dyn WindowSystem,
    registry: &dyn PluginProcessRegistry,
    request: RegistrationRequest,
) -> RegistrationStep {
    let RegistrationRequest {
        view,
        plugin,
        intermediate,
        attempts_left,
    } = request;

    if !windows.is_window(intermediate) {
        embedder.intermediates.remove(&intermediate);
        return RegistrationStep::Abandoned;
    }

    match registry.register_intermediate_window(plugin, intermediate) {
        RegistrationOutcome::Registered => {
            debug!(%plugin, %intermediate, "intermediate window registered");
            RegistrationStep::Registered
        }
        RegistrationOutcome::ProcessStarting if attempts_left > 1 => {
            debug!(%plugin, attempts_left, "plugin process still starting, retrying");
            RegistrationStep::Retry(RegistrationRequest {
                attempts_left: attempts_left - 1,
                ..request
            })
        }
        outcome => {
            warn!(%plugin, %intermediate, ?outcome, "giving up on intermediate window");
            registry.teardown_intermediate_window(intermediate);
            embedder.unwrap_plugin(windows, view, intermediate);
            RegistrationStep::TornDown
        }
    }
}
