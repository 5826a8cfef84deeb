//! Placement of plugin windows owned by other processes.
//!
//! Plugin windows can vanish at any moment without notice, so every update
//! re-validates its window right before acting and silently skips stale
//! ones. Out-of-process plugin windows that sit directly under the view get
//! a locally owned intermediate window wrapped around them; later moves
//! only touch the intermediate, which never crosses a process boundary.

mod registration;


use std::collections::BTreeMap;

use canopy_common::types::{Rect, Region, WindowId};
use canopy_config::PluginConfig;
use canopy_platform::{PluginProcessRegistry, WindowKind, WindowPlacement, WindowSystem};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use registration::{RegistrationRequest, RegistrationStep};

/// Explicit clip: the window shows `clip_rect` minus `cutouts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipGeometry {
    pub clip_rect: Rect,
    #[serde(default)]
    pub cutouts: Vec<Rect>,
}

impl ClipGeometry {
    pub fn region(&self) -> Region {
        let mut region = Region::from_rect(self.clip_rect);
        for cutout in &self.cutouts {
            region.subtract(cutout);
        }
        region
    }
}

/// One entry of a geometry batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginGeometry {
    pub window: WindowId,
    pub window_rect: Rect,
    /// Without clip geometry only visibility is applied.
    #[serde(default)]
    pub clip: Option<ClipGeometry>,
    pub visible: bool,
}

/// What one call to [`PluginWindowEmbedder::apply_batch`] did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub placed: usize,
    pub skipped: usize,
    /// Intermediates dropped because their plugin window went away.
    pub swept: usize,
    pub committed: bool,
    /// Intermediate windows created by this batch, waiting to be
    /// registered with the plugin process registry.
    pub registrations: Vec<RegistrationRequest>,
}

#[derive(Debug)]
pub struct PluginWindowEmbedder {
    out_of_process: bool,
    registration_attempts: u32,
    /// intermediate -> plugin
    intermediates: BTreeMap<WindowId, WindowId>,
}

impl PluginWindowEmbedder {
    pub fn new(config: &PluginConfig) -> Self {
        Self {
            out_of_process: config.out_of_process,
            registration_attempts: config.registration_attempts.max(1),
            intermediates: BTreeMap::new(),
        }
    }

    pub fn intermediate_for(&self, plugin: WindowId) -> Option<WindowId> {
        self.intermediates
            .iter()
            .find(|(_, p)| **p == plugin)
            .map(|(i, _)| *i)
    }

    pub fn intermediate_count(&self) -> usize {
        self.intermediates.len()
    }

    /// Apply `batch` as one placement transaction.
    pub fn apply_batch(
        &mut self,
        windows: &dyn WindowSystem,
        view: WindowId,
        batch: &[PluginGeometry],
    ) -> BatchReport {
        let mut report = BatchReport {
            swept: self.sweep(windows),
            ..BatchReport::default()
        };
        if batch.is_empty() {
            return report;
        }

        let mut placements = Vec::with_capacity(batch.len());
        for update in batch {
            // Read the parent before the existence check so a window torn
            // down in between reads as stale rather than as reparented.
            let parent = windows.parent(update.window);
            if !windows.is_window(update.window) {
                debug!(window = %update.window, "skipping stale plugin window");
                report.skipped += 1;
                continue;
            }

            let target = if self.out_of_process {
                match self.placement_target(windows, view, update.window, parent) {
                    Some((target, registration)) => {
                        report.registrations.extend(registration);
                        target
                    }
                    None => {
                        report.skipped += 1;
                        continue;
                    }
                }
            } else {
                update.window
            };

            let bounds = match &update.clip {
                Some(clip) => {
                    windows.set_window_region(
                        target,
                        Some(clip.region()),
                        !clip.clip_rect.is_empty(),
                    );
                    Some(update.window_rect)
                }
                None => None,
            };
            placements.push(WindowPlacement {
                window: target,
                bounds,
                show: Some(update.visible),
            });
        }

        match windows.apply_placements(&placements) {
            Ok(()) => {
                report.placed = placements.len();
                report.committed = true;
            }
            Err(err) => {
                warn!(%err, count = placements.len(), "plugin placement failed, batch ignored");
            }
        }
        report
    }

    /// Pick the window to move for `plugin`: its intermediate, created on
    /// first sight. `None` means the window is not ours to move.
    fn placement_target(
        &mut self,
        windows: &dyn WindowSystem,
        view: WindowId,
        plugin: WindowId,
        parent: Option<WindowId>,
    ) -> Option<(WindowId, Option<RegistrationRequest>)> {
        let parent = parent?;
        if parent == view {
            let intermediate = self.reparent(windows, view, plugin)?;
            let request = RegistrationRequest {
                view,
                plugin,
                intermediate,
                attempts_left: self.registration_attempts,
            };
            return Some((intermediate, Some(request)));
        }
        if windows.parent(parent) != Some(view) {
            debug!(window = %plugin, %parent, "plugin window is not under this view, skipping");
            return None;
        }
        Some((parent, None))
    }

    fn reparent(
        &mut self,
        windows: &dyn WindowSystem,
        view: WindowId,
        plugin: WindowId,
    ) -> Option<WindowId> {
        let intermediate = match windows.create_window(
            Some(view),
            WindowKind::Intermediate,
            Rect::default(),
        ) {
            Ok(window) => window,
            Err(err) => {
                warn!(%err, %plugin, "could not create intermediate window");
                return None;
            }
        };
        // Disabled plugin windows pass mouse input up to the view; the
        // wrapper has to match.
        windows.set_disabled(intermediate, windows.is_disabled(plugin));
        windows.set_parent(plugin, Some(intermediate));
        // Plugin windows are created hidden.
        windows.set_visible(plugin, true, false);
        self.intermediates.insert(intermediate, plugin);
        debug!(%plugin, %intermediate, "plugin window wrapped");
        Some(intermediate)
    }

    /// The plugin process released `intermediate`. Returns false if it
    /// was not one of ours.
    pub fn release_intermediate(
        &mut self,
        windows: &dyn WindowSystem,
        view: WindowId,
        intermediate: WindowId,
    ) -> bool {
        if !self.intermediates.contains_key(&intermediate) {
            debug!(%intermediate, "release for unknown intermediate window");
            return false;
        }
        self.unwrap_plugin(windows, view, intermediate);
        true
    }

    /// Forget `intermediate` and destroy it. A plugin window still inside
    /// is moved back under `view` first; it belongs to another process.
    fn unwrap_plugin(
        &mut self,
        windows: &dyn WindowSystem,
        view: WindowId,
        intermediate: WindowId,
    ) {
        let Some(plugin) = self.intermediates.remove(&intermediate) else {
            return;
        };
        if !windows.is_window(intermediate) {
            return;
        }
        if windows.is_window(plugin) && windows.parent(plugin) == Some(intermediate) {
            windows.set_parent(plugin, Some(view));
        }
        windows.destroy_window(intermediate);
        debug!(%plugin, %intermediate, "intermediate window destroyed");
    }

    /// Drop intermediates whose plugin window is gone. Returns how many.
    pub fn sweep(&mut self, windows: &dyn WindowSystem) -> usize {
        let empty: Vec<WindowId> = self
            .intermediates
            .keys()
            .copied()
            .filter(|i| !windows.is_window(*i) || windows.children(*i).is_empty())
            .collect();
        for intermediate in &empty {
            self.intermediates.remove(intermediate);
            if windows.is_window(*intermediate) {
                windows.destroy_window(*intermediate);
            }
            debug!(%intermediate, "dropping empty intermediate window");
        }
        empty.len()
    }

    /// Hide and orphan every plugin window under `view` whose thread still
    /// responds, so it outlives the view. Returns how many were detached.
    pub fn detach_plugin_windows(&mut self, windows: &dyn WindowSystem, view: WindowId) -> usize {
        let mut detached = 0;
        for window in descendants(windows, view) {
            if windows.is_plugin_window(window) && !windows.is_hung(window) {
                windows.set_visible(window, false, false);
                windows.set_parent(window, None);
                detached += 1;
            }
        }
        self.intermediates.clear();
        detached
    }

    /// Tell every plugin window under `view` that `screen_rect` was painted.
    pub fn notify_painted(&self, windows: &dyn WindowSystem, view: WindowId, screen_rect: Rect) {
        for window in descendants(windows, view) {
            if windows.is_plugin_window(window) {
                windows.notify_plugin_paint(window, screen_rect);
            }
        }
    }

    pub fn run_registration(
        &mut self,
        windows: &dyn WindowSystem,
        registry: &dyn PluginProcessRegistry,
        request: RegistrationRequest,
    ) -> RegistrationStep {
        registration::run(self, windows, registry, request)
    }
}

/// Every window below `root`, depth first.
fn descendants(windows: &dyn WindowSystem, root: WindowId) -> Vec<WindowId> {
    let mut out = Vec::new();
    let mut stack = windows.children(root);
    stack.reverse();
    while let Some(window) = stack.pop() {
        out.push(window);
        let mut children = windows.children(window);
        children.reverse();
        stack.extend(children);
    }
    out
}
