use canopy_common::errors::PlatformError;
use canopy_common::types::{Point, Rect, Region, Size, WindowId};
use tracing::debug;

use super::{HeadlessPlatform, PlatformOp, WindowRecord};
use crate::input::WheelEvent;
use crate::window::{CursorKind, ResizeCorner, WindowKind, WindowPlacement, WindowSystem};
use crate::Result;

impl WindowSystem for HeadlessPlatform {
    fn create_window(
        &self,
        parent: Option<WindowId>,
        kind: WindowKind,
        bounds: Rect,
    ) -> Result<WindowId> {
        let mut state = self.state.borrow_mut();
        if state.fail_window_creation {
            return Err(PlatformError::WindowCreation(format!(
                "{kind:?} window creation disabled"
            )));
        }
        if let Some(parent) = parent {
            if !state.windows.contains_key(&parent) {
                return Err(PlatformError::NoSuchWindow(parent));
            }
        }
        let window = state.insert_window(WindowRecord {
            parent,
            kind,
            bounds,
            visible: false,
            disabled: false,
            plugin: false,
            hung: false,
            region: None,
        });
        state.ops.push(PlatformOp::Created { window, kind });
        debug!(%window, ?kind, "headless window created");
        Ok(window)
    }

    fn destroy_window(&self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        for removed in state.remove_tree(window) {
            state.ops.push(PlatformOp::Destroyed(removed));
        }
    }

    fn is_window(&self, window: WindowId) -> bool {
        self.state.borrow().windows.contains_key(&window)
    }

    fn parent(&self, window: WindowId) -> Option<WindowId> {
        self.state.borrow().windows.get(&window)?.parent
    }

    fn set_parent(&self, window: WindowId, parent: Option<WindowId>) {
        let mut state = self.state.borrow_mut();
        if parent.is_some_and(|p| !state.windows.contains_key(&p)) {
            return;
        }
        let Some(record) = state.windows.get_mut(&window) else {
            return;
        };
        record.parent = parent;
        state.ops.push(PlatformOp::Reparented { window, parent });
    }

    fn children(&self, window: WindowId) -> Vec<WindowId> {
        self.state.borrow().children_of(window)
    }

    fn root_ancestor(&self, window: WindowId) -> WindowId {
        let state = self.state.borrow();
        let mut current = window;
        while let Some(parent) = state.windows.get(&current).and_then(|w| w.parent) {
            current = parent;
        }
        current
    }

    fn is_disabled(&self, window: WindowId) -> bool {
        self.state
            .borrow()
            .windows
            .get(&window)
            .is_some_and(|w| w.disabled)
    }

    fn set_disabled(&self, window: WindowId, disabled: bool) {
        if let Some(record) = self.state.borrow_mut().windows.get_mut(&window) {
            record.disabled = disabled;
        }
    }

    fn is_plugin_window(&self, window: WindowId) -> bool {
        self.state
            .borrow()
            .windows
            .get(&window)
            .is_some_and(|w| w.plugin)
    }

    fn is_intermediate_window(&self, window: WindowId) -> bool {
        self.state
            .borrow()
            .windows
            .get(&window)
            .is_some_and(|w| w.kind == WindowKind::Intermediate)
    }

    fn is_hung(&self, window: WindowId) -> bool {
        self.state
            .borrow()
            .windows
            .get(&window)
            .is_some_and(|w| w.hung)
    }

    fn set_visible(&self, window: WindowId, visible: bool, activate: bool) {
        let mut state = self.state.borrow_mut();
        let Some(record) = state.windows.get_mut(&window) else {
            return;
        };
        record.visible = visible;
        if visible && activate {
            state.foreground = Some(window);
        }
        state.ops.push(if visible {
            PlatformOp::Shown { window, activate }
        } else {
            PlatformOp::Hidden(window)
        });
    }

    fn is_visible(&self, window: WindowId) -> bool {
        self.state
            .borrow()
            .windows
            .get(&window)
            .is_some_and(|w| w.visible)
    }

    fn set_bounds(&self, window: WindowId, bounds: Rect) {
        let mut state = self.state.borrow_mut();
        let Some(record) = state.windows.get_mut(&window) else {
            return;
        };
        record.bounds = bounds;
        state.ops.push(PlatformOp::Moved { window, bounds });
    }

    fn resize(&self, window: WindowId, size: Size) {
        let Some(current) = self.state.borrow().windows.get(&window).map(|w| w.bounds) else {
            return;
        };
        self.set_bounds(
            window,
            Rect::new(current.x, current.y, size.width, size.height),
        );
    }

    fn client_rect(&self, window: WindowId) -> Rect {
        self.state
            .borrow()
            .windows
            .get(&window)
            .map(|w| Rect::from_size(w.bounds.size()))
            .unwrap_or_default()
    }

    fn screen_origin(&self, window: WindowId) -> Point {
        self.state.borrow().screen_origin(window)
    }

    fn child_at(&self, window: WindowId, point: Point) -> Option<WindowId> {
        let state = self.state.borrow();
        state
            .windows
            .iter()
            .rev()
            .find(|(_, w)| {
                w.parent == Some(window) && w.visible && w.bounds.contains(point.x, point.y)
            })
            .map(|(id, _)| *id)
    }

    fn apply_placements(&self, placements: &[WindowPlacement]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next_placement) {
            return Err(PlatformError::Placement(format!(
                "transaction of {} windows rejected",
                placements.len()
            )));
        }
        if let Some(missing) = placements
            .iter()
            .find(|p| !state.windows.contains_key(&p.window))
        {
            return Err(PlatformError::NoSuchWindow(missing.window));
        }
        for placement in placements {
            Self::apply_placement(&mut state, placement);
        }
        state.ops.push(PlatformOp::Placed(placements.len()));
        Ok(())
    }

    fn set_window_region(&self, window: WindowId, region: Option<Region>, _redraw: bool) {
        let mut state = self.state.borrow_mut();
        let Some(record) = state.windows.get_mut(&window) else {
            return;
        };
        let clipped = region.is_some();
        record.region = region;
        state.ops.push(PlatformOp::RegionSet { window, clipped });
    }

    fn request_paint(&self, window: WindowId) {
        if self.is_window(window) {
            self.record(PlatformOp::PaintRequested(window));
        }
    }

    fn notify_plugin_paint(&self, plugin: WindowId, screen_rect: Rect) {
        if self.is_window(plugin) {
            self.record(PlatformOp::PluginPaintNotified {
                plugin,
                rect: screen_rect,
            });
        }
    }

    fn set_capture(&self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        if state.windows.contains_key(&window) {
            state.capture = Some(window);
            state.ops.push(PlatformOp::CaptureSet(window));
        }
    }

    fn release_capture(&self) {
        let mut state = self.state.borrow_mut();
        state.capture = None;
        state.ops.push(PlatformOp::CaptureReleased);
    }

    fn capture(&self) -> Option<WindowId> {
        self.state.borrow().capture
    }

    fn focus(&self) -> Option<WindowId> {
        self.state.borrow().focus
    }

    fn set_focus(&self, window: Option<WindowId>) {
        let mut state = self.state.borrow_mut();
        if window.is_some_and(|w| !state.windows.contains_key(&w)) {
            return;
        }
        state.focus = window;
        state.ops.push(PlatformOp::FocusSet(window));
    }

    fn foreground_window(&self) -> Option<WindowId> {
        self.state.borrow().foreground
    }

    fn dismiss_owned_popups(&self, toplevel: WindowId) {
        self.record(PlatformOp::PopupsDismissed(toplevel));
    }

    fn begin_resize_drag(&self, root: WindowId, corner: ResizeCorner) -> bool {
        let accepted = self.state.borrow().resize_drag_accepted;
        if accepted {
            self.record(PlatformOp::ResizeDrag { root, corner });
        }
        accepted
    }

    fn reroute_wheel(&self, source: WindowId, _event: &WheelEvent) -> bool {
        let consumed = self.state.borrow().reroute_consumes_wheel;
        if consumed {
            self.record(PlatformOp::WheelRerouted(source));
        }
        consumed
    }

    fn track_mouse_leave(&self, window: WindowId, enable: bool) {
        self.record(PlatformOp::MouseLeaveTracking {
            window,
            enabled: enable,
        });
    }

    fn window_under_cursor(&self) -> Option<WindowId> {
        self.state.borrow().under_cursor
    }

    fn cursor_position(&self) -> Point {
        self.state.borrow().cursor_position
    }

    fn set_cursor(&self, cursor: CursorKind) {
        let mut state = self.state.borrow_mut();
        state.cursor = Some(cursor);
        state.ops.push(PlatformOp::Cursor(cursor));
    }
}
