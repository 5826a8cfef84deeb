//! Native window notifications.

use std::time::Instant;

use canopy_platform::{KeyCode, KeyEvent, KeyKind, PointerEvent, WheelEvent};
use tracing::{debug, trace};

use super::{DeferredTask, MouseActivation, ViewSurface};
use crate::channel::{AccessibleHandle, RemoteMessage};
use crate::ime::CompositionUpdate;
use crate::input::{ConsumedBy, InputOutcome, InputRouter, RouteContext};

impl ViewSurface {
    /// The router plus a borrow of everything it routes against.
    fn input_parts(&mut self) -> Option<(&mut InputRouter, RouteContext<'_>)> {
        let window = self.window?;
        let container = self.container();
        let cx = RouteContext {
            process: self.ctx.as_ref(),
            window,
            remote: &mut self.remote,
            container,
            popup: self.focus.close_on_deactivate(),
            activatable: self.activatable,
            resizer: self.resizer,
            tooltip: &self.tooltip,
        };
        Some((&mut self.input, cx))
    }

    pub fn on_pointer(&mut self, event: &PointerEvent) -> InputOutcome {
        match self.input_parts() {
            Some((router, cx)) => router.route_pointer(cx, event),
            None => InputOutcome::Dropped,
        }
    }

    pub fn on_wheel(&mut self, event: &WheelEvent) -> InputOutcome {
        match self.input_parts() {
            Some((router, cx)) => router.route_wheel(cx, event),
            None => InputOutcome::Dropped,
        }
    }

    /// Keys. Tab in a popup dismisses it and moves focus on in the
    /// container instead of reaching the page.
    pub fn on_key(&mut self, event: &KeyEvent, now: Instant) -> InputOutcome {
        if self.is_popup() && is_tab(event) {
            debug!(kind = ?event.kind, "tab dismisses popup");
            self.on_cancel_mode(now);
            if let Some(container) = self.container() {
                container.advance_focus(event);
            }
            return InputOutcome::Consumed(ConsumedBy::PopupDismissal);
        }
        match self.input_parts() {
            Some((router, cx)) => router.route_key(cx, event),
            None => InputOutcome::Dropped,
        }
    }

    pub fn on_activate(&mut self, active: bool, now: Instant) {
        if self.focus.should_dismiss_on_activate(active) {
            self.on_cancel_mode(now);
        }
    }

    /// Dismiss an auto-closing popup: hide it now, shut the remote widget
    /// down from the task queue. Repeated requests schedule nothing new.
    pub fn on_cancel_mode(&mut self, now: Instant) {
        if !self.focus.on_cancel_mode(&mut self.remote) {
            return;
        }
        if let Some(window) = self.window {
            self.platform().windows.set_visible(window, false, false);
        }
        let task = self.tasks.schedule(now, DeferredTask::ShutdownHost);
        self.focus.set_pending_shutdown(task);
    }

    pub fn on_set_focus(&mut self) {
        self.focus.on_focus_gained(&mut self.remote);
    }

    pub fn on_kill_focus(&mut self) {
        self.focus.on_focus_lost(&mut self.remote);
        self.input.on_focus_lost();
    }

    pub fn on_capture_changed(&mut self) {
        self.focus.on_capture_lost(&mut self.remote);
    }

    /// Decide whether a click may activate the top-level window. A click
    /// on a plugin window takes focus without activating.
    pub fn on_mouse_activate(&mut self) -> MouseActivation {
        if !self.activatable {
            return MouseActivation::NoActivate;
        }
        let Some(window) = self.window else {
            return MouseActivation::Activate;
        };
        let windows = &*self.platform().windows;
        let focus_inside = windows
            .focus()
            .is_some_and(|focused| focused != window && self.contains_native_view(focused));
        if !focus_inside {
            let origin = windows.screen_origin(window);
            let point = windows.cursor_position().offset(-origin.x, -origin.y);
            if let Some(child) = windows.child_at(window, point) {
                let target = if windows.is_intermediate_window(child) {
                    windows.children(child).first().copied()
                } else {
                    Some(child)
                };
                trace!(%child, ?target, "click on child window takes focus");
                windows.set_focus(target);
                return MouseActivation::NoActivate;
            }
        }
        MouseActivation::Activate
    }

    pub fn on_set_cursor(&self) {
        self.update_cursor_if_over_self();
    }

    pub fn on_input_language_changed(&mut self) {
        let ime = &*self.ctx.platform().ime;
        self.ime.on_input_language_changed(ime, &mut self.remote);
    }

    pub fn on_theme_changed(&mut self) {
        self.remote.send(RemoteMessage::SystemThemeChanged);
    }

    pub fn on_tooltip_shown(&mut self) {
        self.tooltip.on_shown();
    }

    pub fn on_tooltip_popped(&mut self) {
        self.tooltip.on_popped();
    }

    /// The tooltip control asks for its text.
    pub fn on_tooltip_text_request(&self) -> Option<String> {
        self.tooltip
            .text_request(&*self.platform().tooltips)
            .map(str::to_owned)
    }

    pub fn on_ime_set_context(&mut self, active: bool) {
        let Some(window) = self.window else {
            return;
        };
        let ime = &*self.ctx.platform().ime;
        self.ime.on_set_context(ime, window, active, &mut self.remote);
    }

    pub fn on_ime_start_composition(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        let ime = &*self.ctx.platform().ime;
        self.ime.on_start_composition(ime, window, &self.remote);
    }

    pub fn on_ime_composition(&mut self, update: &CompositionUpdate) {
        let Some(window) = self.window else {
            return;
        };
        let ime = &*self.ctx.platform().ime;
        self.ime.on_composition(ime, window, update, &mut self.remote);
    }

    pub fn on_ime_end_composition(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        let ime = &*self.ctx.platform().ime;
        self.ime.on_end_composition(ime, window, &mut self.remote);
    }

    /// Root accessible object, built by the remote side on first request
    /// when renderer accessibility is enabled.
    pub fn on_accessibility_request(&mut self) -> Option<AccessibleHandle> {
        let config = &self.ctx.config().accessibility;
        if !config.renderer_accessible {
            return None;
        }
        if self.accessibility_root.is_none() {
            self.accessibility_root = self.remote.create_accessibility_root(config.root_id);
        }
        self.accessibility_root
    }
}

fn is_tab(event: &KeyEvent) -> bool {
    match event.kind {
        KeyKind::Down | KeyKind::Up => event.code == KeyCode::Tab,
        KeyKind::Char => matches!(event.code, KeyCode::Char('\t') | KeyCode::Tab),
    }
}
