use std::time::Instant;

use tracing::{debug, info, warn};

use super::{DeferredTask, ViewSurface};
use crate::channel::RemoteMessage;
use crate::plugins::RegistrationStep;

impl ViewSurface {
    /// True once the window was torn down by `destroy()` or `widget_gone()`.
    pub fn is_destroyed(&self) -> bool {
        self.window.is_none() && self.focus.being_destroyed()
    }

    /// Tear the view down. Pending deferred work is revoked first so
    /// nothing runs against a dead window.
    pub fn destroy(&mut self) {
        self.focus.mark_being_destroyed();
        if let Some(task) = self.focus.take_pending_shutdown() {
            self.tasks.revoke(task);
        }
        self.tasks.revoke_all();
        self.destroy_window();
    }

    /// The remote widget went away (crash or normal close).
    pub fn widget_gone(&mut self) {
        // Leave no loading or resize cursor behind.
        self.update_cursor_if_over_self();
        self.focus.mark_being_destroyed();
        self.tasks.revoke_all();
        self.destroy_window();
    }

    /// Drop the remote reference; later notifications become no-ops.
    pub fn will_destroy_remote_widget(&mut self) {
        debug!("remote widget reference cleared");
        self.remote.clear();
    }

    fn destroy_window(&mut self) {
        let Some(window) = self.window.take() else {
            return;
        };
        let ctx = self.ctx.clone();
        let platform = ctx.platform();
        let detached = self
            .plugins
            .detach_plugin_windows(&*platform.windows, window);
        self.tooltip.reset(&*platform.tooltips);
        self.input
            .set_leave_tracking(&*platform.windows, window, false);
        platform.windows.destroy_window(window);
        info!(%window, detached, "view window destroyed");
    }

    /// Run every deferred task due at `now`. Returns how many ran.
    pub fn run_pending_tasks(&mut self, now: Instant) -> usize {
        let due = self.tasks.take_due(now);
        let mut ran = 0;
        for (id, task) in due {
            ran += 1;
            match task {
                DeferredTask::ShutdownHost => {
                    if self.focus.take_pending_shutdown() != Some(id) {
                        debug!(?id, "shutdown task was superseded, skipping");
                        continue;
                    }
                    self.shutdown_host();
                }
                DeferredTask::Register(request) => {
                    let ctx = self.ctx.clone();
                    let platform = ctx.platform();
                    let step = self.plugins.run_registration(
                        &*platform.windows,
                        &*platform.plugins,
                        request,
                    );
                    if let RegistrationStep::Retry(next) = step {
                        let delay = ctx.config().plugins.registration_delay();
                        self.tasks.schedule(now + delay, DeferredTask::Register(next));
                    }
                }
            }
            if self.is_destroyed() {
                break;
            }
        }
        ran
    }

    fn shutdown_host(&mut self) {
        debug!(window = ?self.window, "shutting down remote widget");
        self.tasks.revoke_all();
        self.remote.send(RemoteMessage::Shutdown);
        self.destroy();
    }

    /// Final teardown after the window is gone. Tells the remote side the
    /// view no longer exists.
    pub fn finalize(mut self) {
        if self.window.is_some() {
            self.destroy();
        } else if !self.remote.is_present() && !self.focus.being_destroyed() {
            warn!("view finalized without a window or remote widget");
        }
        self.remote.send(RemoteMessage::ViewDestroyed);
    }
}
