use std::rc::Rc;

use canopy_common::types::{Point, Rect, WindowId};
use canopy_platform::{
    KeyEvent, KeyKind, MouseButton, PointerEvent, PointerKind, ResizeCorner, WheelEvent,
    WindowSystem,
};
use tracing::{debug, trace};

use super::keyboard::{EnterKeyFilter, TextDirectionTracker};
use super::{ConsumedBy, InputOutcome};
use crate::channel::{RemoteMessage, RemoteSlot};
use crate::parent::ParentContainer;
use crate::process::ProcessContext;
use crate::tooltip::TooltipController;

/// Borrowed view state the router needs for one event.
pub struct RouteContext<'a> {
    pub process: &'a ProcessContext,
    pub window: WindowId,
    pub remote: &'a mut RemoteSlot,
    pub container: Option<Rc<dyn ParentContainer>>,
    /// The view is an auto-dismiss popup.
    pub popup: bool,
    pub activatable: bool,
    /// Resize corner of the top-level window, in view coordinates.
    pub resizer: Rect,
    pub tooltip: &'a TooltipController,
}

#[derive(Debug, Default)]
pub struct InputRouter {
    enter: EnterKeyFilter,
    direction: TextDirectionTracker,
    tracking_leave: bool,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tracking_leave(&self) -> bool {
        self.tracking_leave
    }

    pub fn enter_captured(&self) -> bool {
        self.enter.is_captured()
    }

    pub fn route_pointer(&mut self, cx: RouteContext<'_>, event: &PointerEvent) -> InputOutcome {
        let process = cx.process;
        let platform = process.platform();
        let windows = &*platform.windows;
        cx.tooltip.relay(&*platform.tooltips, event);

        if cx.popup {
            if event.is_button_down() && offer_pointer(windows, &cx, event) {
                return InputOutcome::Consumed(ConsumedBy::Parent);
            }
        } else {
            if event.kind == PointerKind::Down(MouseButton::Left)
                && cx.remote.is_present()
                && cx.resizer.contains(event.position.x, event.position.y)
            {
                let corner = if process.is_rtl_ui() {
                    ResizeCorner::BottomLeft
                } else {
                    ResizeCorner::BottomRight
                };
                let root = windows.root_ancestor(cx.window);
                if windows.begin_resize_drag(root, corner) {
                    debug!(%root, ?corner, "pointer down on resizer, resize drag started");
                    return InputOutcome::Consumed(ConsumedBy::ResizeDrag);
                }
            }
            let offered = matches!(
                event.kind,
                PointerKind::Down(_) | PointerKind::Move | PointerKind::Leave
            );
            if offered && offer_pointer(windows, &cx, event) {
                return InputOutcome::Consumed(ConsumedBy::Parent);
            }
            // The page does not always notice a click moving focus to a
            // popup menu, so any composition in progress is finished here.
            if event.kind == PointerKind::Down(MouseButton::Left) {
                platform.ime.cleanup_composition(cx.window);
            }
        }

        self.forward_pointer(windows, cx, event)
    }

    fn forward_pointer(
        &mut self,
        windows: &dyn WindowSystem,
        cx: RouteContext<'_>,
        event: &PointerEvent,
    ) -> InputOutcome {
        if !cx.remote.is_present() {
            return InputOutcome::Dropped;
        }
        // Send before touching capture so the remote side sees the up
        // before any capture loss.
        cx.remote.send(RemoteMessage::Pointer(*event));

        match event.kind {
            PointerKind::Move => self.set_leave_tracking(windows, cx.window, true),
            PointerKind::Leave => self.set_leave_tracking(windows, cx.window, false),
            PointerKind::Down(_) | PointerKind::DoubleClick(_) => windows.set_capture(cx.window),
            PointerKind::Up(_) => {
                if windows.capture() == Some(cx.window) {
                    windows.release_capture();
                }
            }
        }
        if cx.activatable && event.is_button_down() {
            windows.set_focus(Some(cx.window));
        }
        InputOutcome::Forwarded
    }

    pub fn set_leave_tracking(&mut self, windows: &dyn WindowSystem, window: WindowId, on: bool) {
        if self.tracking_leave != on {
            windows.track_mouse_leave(window, on);
            self.tracking_leave = on;
        }
    }

    /// Route a key event. Tab handling for popups happens before this, in
    /// the view.
    pub fn route_key(&mut self, cx: RouteContext<'_>, event: &KeyEvent) -> InputOutcome {
        if cx.popup && event.kind != KeyKind::Char {
            if let Some(container) = &cx.container {
                if container.pre_handle_key(event) {
                    return InputOutcome::Consumed(ConsumedBy::Parent);
                }
            }
        }
        if !cx.remote.is_present() {
            return InputOutcome::Dropped;
        }

        if cx.process.has_rtl_keyboard_layout() {
            if let Some(direction) = self.direction.on_key(event) {
                debug!(?direction, "text direction shortcut");
                cx.remote
                    .send(RemoteMessage::TextDirectionChanged { direction });
            }
        }

        if !self.enter.admit(event) {
            trace!(?event, "dropping enter key not pressed in this view");
            return InputOutcome::Dropped;
        }
        cx.remote.send(RemoteMessage::Key(*event));
        InputOutcome::Forwarded
    }

    pub fn route_wheel(&mut self, cx: RouteContext<'_>, event: &WheelEvent) -> InputOutcome {
        let process = cx.process;
        let windows = &*process.platform().windows;
        if windows.reroute_wheel(cx.window, event) {
            return InputOutcome::Consumed(ConsumedBy::Reroute);
        }

        // Some wheel drivers deliver to background windows; close our own
        // popups in that case.
        if windows.foreground_window() != Some(cx.window) {
            windows.dismiss_owned_popups(windows.root_ancestor(cx.window));
        }

        if let Some(container) = &cx.container {
            if container.reflected_wheel(event) {
                return InputOutcome::Consumed(ConsumedBy::Parent);
            }
        }
        if cx.remote.send(RemoteMessage::Wheel(*event)) {
            InputOutcome::Forwarded
        } else {
            InputOutcome::Dropped
        }
    }

    /// Focus left the view; held keys are no longer ours to track.
    pub fn on_focus_lost(&mut self) {
        self.direction.reset();
    }
}

/// Offer `event` to the container in its own client coordinates.
fn offer_pointer(windows: &dyn WindowSystem, cx: &RouteContext<'_>, event: &PointerEvent) -> bool {
    let Some(container) = &cx.container else {
        return false;
    };
    let mut translated = *event;
    if event.kind != PointerKind::Leave {
        translated.position = to_container(windows, cx.window, container.native_window(), event.position);
    }
    container.pre_handle_pointer(&translated)
}

fn to_container(windows: &dyn WindowSystem, view: WindowId, container: WindowId, point: Point) -> Point {
    let from = windows.screen_origin(view);
    let to = windows.screen_origin(container);
    point.offset(from.x - to.x, from.y - to.y)
}
