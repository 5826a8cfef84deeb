//! In-memory platform backend.
//!
//! Keeps a window tree, focus/capture state and tooltip controls in a
//! `RefCell`, and appends every mutating call to an operation log so tests
//! and the replay tool can see what the controller asked for. Knobs on
//! [`HeadlessPlatform`] simulate the behaviour of other processes: plugin
//! windows appearing or vanishing, hung threads, registry races.

mod services;
mod window;

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};

use canopy_common::types::{Point, Rect, Region, TooltipId, WindowId};
use serde::Serialize;

use crate::keyboard::LanguageId;
use crate::plugin_registry::RegistrationOutcome;
use crate::window::{CursorKind, ResizeCorner, WindowKind, WindowPlacement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub parent: Option<WindowId>,
    pub kind: WindowKind,
    pub bounds: Rect,
    pub visible: bool,
    pub disabled: bool,
    pub plugin: bool,
    pub hung: bool,
    pub region: Option<Region>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TooltipRecord {
    pub owner: Option<WindowId>,
    pub rect: Rect,
    pub max_width: u32,
    pub showing: bool,
    pub pops: usize,
    pub popups: usize,
    pub relayed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImeOp {
    SetLanguage,
    CreateWindow,
    DestroyWindow,
    UpdateWindow,
    Cleanup,
    Reset,
    Enable { caret: Rect, complete: bool },
    Disable,
}

/// One mutating call made against the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformOp {
    Created { window: WindowId, kind: WindowKind },
    Destroyed(WindowId),
    Reparented { window: WindowId, parent: Option<WindowId> },
    Shown { window: WindowId, activate: bool },
    Hidden(WindowId),
    Moved { window: WindowId, bounds: Rect },
    Placed(usize),
    RegionSet { window: WindowId, clipped: bool },
    PaintRequested(WindowId),
    PluginPaintNotified { plugin: WindowId, rect: Rect },
    CaptureSet(WindowId),
    CaptureReleased,
    FocusSet(Option<WindowId>),
    PopupsDismissed(WindowId),
    ResizeDrag { root: WindowId, corner: ResizeCorner },
    WheelRerouted(WindowId),
    MouseLeaveTracking { window: WindowId, enabled: bool },
    Cursor(CursorKind),
    Ime { window: Option<WindowId>, op: ImeOp },
    Registration {
        plugin: WindowId,
        intermediate: WindowId,
        outcome: RegistrationOutcome,
    },
    Teardown(WindowId),
}

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    windows: BTreeMap<WindowId, WindowRecord>,
    tooltips: HashMap<TooltipId, TooltipRecord>,
    capture: Option<WindowId>,
    focus: Option<WindowId>,
    foreground: Option<WindowId>,
    under_cursor: Option<WindowId>,
    cursor_position: Point,
    cursor: Option<CursorKind>,
    ops: Vec<PlatformOp>,

    fail_window_creation: bool,
    fail_next_placement: bool,
    fail_tooltip_creation: bool,
    reroute_consumes_wheel: bool,
    resize_drag_accepted: bool,
    language_has_ime: bool,
    layouts: Option<Vec<LanguageId>>,
    layout_queries: usize,
    registration_outcomes: VecDeque<RegistrationOutcome>,
}

impl State {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_window(&mut self, record: WindowRecord) -> WindowId {
        let id = WindowId(self.allocate_id());
        self.windows.insert(id, record);
        id
    }

    fn children_of(&self, window: WindowId) -> Vec<WindowId> {
        self.windows
            .iter()
            .filter(|(_, w)| w.parent == Some(window))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Remove `window` and everything below it.
    fn remove_tree(&mut self, window: WindowId) -> Vec<WindowId> {
        let mut removed = Vec::new();
        let mut stack = vec![window];
        while let Some(id) = stack.pop() {
            if self.windows.remove(&id).is_none() {
                continue;
            }
            stack.extend(self.children_of(id));
            removed.push(id);
        }
        for id in &removed {
            if self.capture == Some(*id) {
                self.capture = None;
            }
            if self.focus == Some(*id) {
                self.focus = None;
            }
            if self.foreground == Some(*id) {
                self.foreground = None;
            }
            if self.under_cursor == Some(*id) {
                self.under_cursor = None;
            }
        }
        self.tooltips
            .retain(|_, tip| !tip.owner.is_some_and(|owner| removed.contains(&owner)));
        removed
    }

    fn screen_origin(&self, window: WindowId) -> Point {
        let mut origin = Point::default();
        let mut current = Some(window);
        while let Some(id) = current {
            let Some(record) = self.windows.get(&id) else {
                break;
            };
            origin = origin.offset(record.bounds.x, record.bounds.y);
            current = record.parent;
        }
        origin
    }
}

/// Headless implementation of every platform trait.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    state: RefCell<State>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        let platform = Self::default();
        platform.state.borrow_mut().resize_drag_accepted = true;
        platform
    }

    /// Create a visible top-level window, standing in for a browser frame.
    pub fn create_top_level(&self, bounds: Rect) -> WindowId {
        self.state.borrow_mut().insert_window(WindowRecord {
            parent: None,
            kind: WindowKind::Child,
            bounds,
            visible: true,
            disabled: false,
            plugin: false,
            hung: false,
            region: None,
        })
    }

    /// Simulate a plugin process creating its window under `parent`.
    pub fn spawn_plugin_window(&self, parent: WindowId, bounds: Rect) -> WindowId {
        self.state.borrow_mut().insert_window(WindowRecord {
            parent: Some(parent),
            kind: WindowKind::Child,
            bounds,
            visible: true,
            disabled: false,
            plugin: true,
            hung: false,
            region: None,
        })
    }

    /// Simulate another process destroying `window` without notice.
    pub fn kill_window(&self, window: WindowId) {
        self.state.borrow_mut().remove_tree(window);
    }

    pub fn set_hung(&self, window: WindowId, hung: bool) {
        if let Some(record) = self.state.borrow_mut().windows.get_mut(&window) {
            record.hung = hung;
        }
    }

    pub fn set_foreground(&self, window: Option<WindowId>) {
        self.state.borrow_mut().foreground = window;
    }

    pub fn set_window_under_cursor(&self, window: Option<WindowId>) {
        self.state.borrow_mut().under_cursor = window;
    }

    pub fn fail_window_creation(&self, fail: bool) {
        self.state.borrow_mut().fail_window_creation = fail;
    }

    /// Make the next placement transaction fail as a whole.
    pub fn fail_next_placement(&self) {
        self.state.borrow_mut().fail_next_placement = true;
    }

    pub fn fail_tooltip_creation(&self, fail: bool) {
        self.state.borrow_mut().fail_tooltip_creation = fail;
    }

    pub fn set_reroute_consumes_wheel(&self, consumes: bool) {
        self.state.borrow_mut().reroute_consumes_wheel = consumes;
    }

    /// Move the pointer to `position` (screen coordinates).
    pub fn set_cursor_position(&self, position: Point) {
        self.state.borrow_mut().cursor_position = position;
    }

    pub fn set_resize_drag_accepted(&self, accepted: bool) {
        self.state.borrow_mut().resize_drag_accepted = accepted;
    }

    pub fn set_language_has_ime(&self, has_ime: bool) {
        self.state.borrow_mut().language_has_ime = has_ime;
    }

    pub fn set_layouts(&self, layouts: Option<Vec<LanguageId>>) {
        self.state.borrow_mut().layouts = layouts;
    }

    /// How many times the installed layouts were read.
    pub fn layout_queries(&self) -> usize {
        self.state.borrow().layout_queries
    }

    /// Queue the answers the registry gives, in order. Once the queue is
    /// empty every registration succeeds.
    pub fn push_registration_outcome(&self, outcome: RegistrationOutcome) {
        self.state
            .borrow_mut()
            .registration_outcomes
            .push_back(outcome);
    }

    pub fn window(&self, window: WindowId) -> Option<WindowRecord> {
        self.state.borrow().windows.get(&window).cloned()
    }

    pub fn tooltip(&self, tooltip: TooltipId) -> Option<TooltipRecord> {
        self.state.borrow().tooltips.get(&tooltip).cloned()
    }

    /// Simulate the tooltip control hiding itself (hover timeout).
    pub fn expire_tooltip(&self, tooltip: TooltipId) {
        if let Some(tip) = self.state.borrow_mut().tooltips.get_mut(&tooltip) {
            tip.showing = false;
        }
    }

    pub fn cursor(&self) -> Option<CursorKind> {
        self.state.borrow().cursor
    }

    pub fn ops(&self) -> Vec<PlatformOp> {
        self.state.borrow().ops.clone()
    }

    pub fn take_ops(&self) -> Vec<PlatformOp> {
        std::mem::take(&mut self.state.borrow_mut().ops)
    }

    /// Windows with a queued paint, in request order, deduplicated.
    pub fn take_paint_requests(&self) -> Vec<WindowId> {
        let mut state = self.state.borrow_mut();
        let mut requested = Vec::new();
        state.ops.retain(|op| match op {
            PlatformOp::PaintRequested(window) => {
                if !requested.contains(window) {
                    requested.push(*window);
                }
                false
            }
            _ => true,
        });
        requested
    }

    fn record(&self, op: PlatformOp) {
        self.state.borrow_mut().ops.push(op);
    }

    fn apply_placement(state: &mut State, placement: &WindowPlacement) {
        let Some(record) = state.windows.get_mut(&placement.window) else {
            return;
        };
        if let Some(bounds) = placement.bounds {
            record.bounds = bounds;
        }
        if let Some(show) = placement.show {
            record.visible = show;
        }
    }
}
