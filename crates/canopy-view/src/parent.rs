//! The container a view is embedded in.
//!
//! The container outlives the view or is torn down independently, so the
//! view only keeps a `Weak` reference and looks it up per event.

use std::cell::RefCell;

use canopy_common::types::WindowId;
use canopy_platform::{KeyEvent, PointerEvent, WheelEvent};

pub trait ParentContainer {
    fn native_window(&self) -> WindowId;

    /// Offer a pointer event before it reaches the remote side. The
    /// position is in the container's client coordinates. Returns true if
    /// the container consumed it.
    fn pre_handle_pointer(&self, event: &PointerEvent) -> bool;

    /// Offer a key event before it reaches the remote side.
    fn pre_handle_key(&self, event: &KeyEvent) -> bool;

    /// Reflected wheel delivery. The container must not route the event
    /// back into the view's own wheel handler.
    fn reflected_wheel(&self, event: &WheelEvent) -> bool;

    /// A Tab key from a dismissed popup; move focus on.
    fn advance_focus(&self, event: &KeyEvent);
}

/// Container that records what it was offered and consumes according to
/// its flags.
#[derive(Debug)]
pub struct RecordingParent {
    window: WindowId,
    pub consume_pointer: bool,
    pub consume_keys: bool,
    pub consume_wheel: bool,
    pub pointers: RefCell<Vec<PointerEvent>>,
    pub keys: RefCell<Vec<KeyEvent>>,
    pub wheels: RefCell<Vec<WheelEvent>>,
    pub focus_advances: RefCell<Vec<KeyEvent>>,
}

impl RecordingParent {
    pub fn new(window: WindowId) -> Self {
        Self {
            window,
            consume_pointer: false,
            consume_keys: false,
            consume_wheel: false,
            pointers: RefCell::default(),
            keys: RefCell::default(),
            wheels: RefCell::default(),
            focus_advances: RefCell::default(),
        }
    }
}

impl ParentContainer for RecordingParent {
    fn native_window(&self) -> WindowId {
        self.window
    }

    fn pre_handle_pointer(&self, event: &PointerEvent) -> bool {
        self.pointers.borrow_mut().push(*event);
        self.consume_pointer
    }

    fn pre_handle_key(&self, event: &KeyEvent) -> bool {
        self.keys.borrow_mut().push(*event);
        self.consume_keys
    }

    fn reflected_wheel(&self, event: &WheelEvent) -> bool {
        self.wheels.borrow_mut().push(*event);
        self.consume_wheel
    }

    fn advance_focus(&self, event: &KeyEvent) {
        self.focus_advances.borrow_mut().push(*event);
    }
}
