//! The native window tree as seen by one view.

use canopy_common::types::{Point, Rect, Region, Size, WindowId};
use serde::{Deserialize, Serialize};

use crate::input::WheelEvent;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// A child of a parent container.
    Child,
    /// A free-floating top-level window (select menus, autocomplete).
    Popup,
    /// A wrapper placed between the view and a plugin window owned by
    /// another process.
    Intermediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeCorner {
    BottomRight,
    BottomLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorKind {
    Arrow,
    IBeam,
    Hand,
    Wait,
    AppStarting,
    ResizeNwse,
    ResizeNesw,
}

/// One entry of an atomic placement transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPlacement {
    pub window: WindowId,
    /// New bounds in the parent's client coordinates. `None` leaves the
    /// window where it is.
    pub bounds: Option<Rect>,
    /// `Some(true)` shows the window, `Some(false)` hides it.
    pub show: Option<bool>,
}

/// Native windowing operations used by the controller.
///
/// Every call may name a window that no longer exists; implementations
/// treat that as a no-op unless the method returns a `Result`.
pub trait WindowSystem {
    fn create_window(
        &self,
        parent: Option<WindowId>,
        kind: WindowKind,
        bounds: Rect,
    ) -> Result<WindowId>;
    fn destroy_window(&self, window: WindowId);

    fn is_window(&self, window: WindowId) -> bool;
    fn parent(&self, window: WindowId) -> Option<WindowId>;
    /// Reparent `window`. `None` detaches it from any parent.
    fn set_parent(&self, window: WindowId, parent: Option<WindowId>);
    fn children(&self, window: WindowId) -> Vec<WindowId>;
    /// The top-level window containing `window` (itself if top-level).
    fn root_ancestor(&self, window: WindowId) -> WindowId;
    fn is_disabled(&self, window: WindowId) -> bool;
    fn set_disabled(&self, window: WindowId, disabled: bool);
    /// True for windows created by a plugin, in or out of process.
    fn is_plugin_window(&self, window: WindowId) -> bool;
    fn is_intermediate_window(&self, window: WindowId) -> bool;
    /// True when the thread owning `window` stopped pumping messages.
    fn is_hung(&self, window: WindowId) -> bool;

    fn set_visible(&self, window: WindowId, visible: bool, activate: bool);
    fn is_visible(&self, window: WindowId) -> bool;
    fn set_bounds(&self, window: WindowId, bounds: Rect);
    fn resize(&self, window: WindowId, size: Size);
    fn client_rect(&self, window: WindowId) -> Rect;
    /// Screen position of the window's client origin.
    fn screen_origin(&self, window: WindowId) -> Point;
    /// Topmost direct child of `window` containing `point` (client coords).
    fn child_at(&self, window: WindowId, point: Point) -> Option<WindowId>;

    /// Move, resize, show or hide several windows as one transaction.
    fn apply_placements(&self, placements: &[WindowPlacement]) -> Result<()>;
    /// Clip a window to `region`; `None` removes clipping.
    fn set_window_region(&self, window: WindowId, region: Option<Region>, redraw: bool);

    /// Queue a paint for `window`.
    fn request_paint(&self, window: WindowId);
    /// Tell an out-of-process plugin window that `screen_rect` was painted
    /// underneath it.
    fn notify_plugin_paint(&self, plugin: WindowId, screen_rect: Rect);

    fn set_capture(&self, window: WindowId);
    fn release_capture(&self);
    fn capture(&self) -> Option<WindowId>;
    fn focus(&self) -> Option<WindowId>;
    fn set_focus(&self, window: Option<WindowId>);
    fn foreground_window(&self) -> Option<WindowId>;
    /// Close popups owned by `toplevel` (menus and the like).
    fn dismiss_owned_popups(&self, toplevel: WindowId);
    /// Hand the pointer to the top-level window's resize loop.
    fn begin_resize_drag(&self, root: WindowId, corner: ResizeCorner) -> bool;
    /// Offer a wheel event to whatever window sits under the pointer.
    /// Returns true if another window consumed it.
    fn reroute_wheel(&self, source: WindowId, event: &WheelEvent) -> bool;
    fn track_mouse_leave(&self, window: WindowId, enable: bool);

    fn window_under_cursor(&self) -> Option<WindowId>;
    /// Pointer position in screen coordinates.
    fn cursor_position(&self) -> Point;
    fn set_cursor(&self, cursor: CursorKind);
}
