//! Input events delivered to a view by the native event loop.
//!
//! Positions are in the receiving window's client coordinates.

use canopy_common::types::Point;
use serde::{Deserialize, Serialize};

/// Modifier key state at the time of the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub super_key: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        super_key: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Down(MouseButton),
    DoubleClick(MouseButton),
    Up(MouseButton),
    Move,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn is_button_down(&self) -> bool {
        matches!(
            self.kind,
            PointerKind::Down(_) | PointerKind::DoubleClick(_)
        )
    }

    pub fn is_button_up(&self) -> bool {
        matches!(self.kind, PointerKind::Up(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub position: Point,
    #[serde(default)]
    pub delta_x: i32,
    pub delta_y: i32,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl WheelEvent {
    pub fn vertical(x: i32, y: i32, delta_y: i32) -> Self {
        Self {
            position: Point::new(x, y),
            delta_x: 0,
            delta_y,
            modifiers: Modifiers::NONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Down,
    Up,
    Char,
}

/// Physical key identity. Only keys the controller treats specially get
/// their own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Enter,
    Tab,
    Escape,
    Backspace,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    Alt,
    Char(char),
    Other(u32),
}

impl KeyCode {
    pub fn is_shift(self) -> bool {
        matches!(self, KeyCode::ShiftLeft | KeyCode::ShiftRight)
    }

    pub fn is_control(self) -> bool {
        matches!(self, KeyCode::ControlLeft | KeyCode::ControlRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub kind: KeyKind,
    pub code: KeyCode,
    #[serde(default)]
    pub repeat: bool,
    /// Delivered through the system-key path (Alt held).
    #[serde(default)]
    pub system: bool,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(kind: KeyKind, code: KeyCode) -> Self {
        Self {
            kind,
            code,
            repeat: false,
            system: false,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn down(code: KeyCode) -> Self {
        Self::new(KeyKind::Down, code)
    }

    pub fn up(code: KeyCode) -> Self {
        Self::new(KeyKind::Up, code)
    }

    pub fn char(c: char) -> Self {
        Self::new(KeyKind::Char, KeyCode::Char(c))
    }
}
