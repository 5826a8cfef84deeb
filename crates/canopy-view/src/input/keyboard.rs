use std::collections::HashSet;

use canopy_platform::{KeyCode, KeyEvent, KeyKind};

use crate::channel::TextDirection;

/// Drops Enter events that belong to a key press started elsewhere.
///
/// Hitting Enter in another field can move focus here mid-press; the
/// trailing repeats and the key-up must not reach the page.
#[derive(Debug, Default)]
pub struct EnterKeyFilter {
    captured: bool,
}

impl EnterKeyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Returns whether `event` may be forwarded.
    pub fn admit(&mut self, event: &KeyEvent) -> bool {
        if event.code != KeyCode::Enter {
            return true;
        }
        match event.kind {
            KeyKind::Down if event.repeat => self.captured,
            KeyKind::Down => {
                self.captured = true;
                true
            }
            KeyKind::Up => std::mem::take(&mut self.captured),
            KeyKind::Char => self.captured,
        }
    }
}

/// Detects Ctrl+Shift alone, the shortcut that flips text direction.
///
/// Right shift selects right-to-left, left shift left-to-right. The
/// direction is reported when shift or control is released, unless another
/// key was pressed in the meantime.
#[derive(Debug, Default)]
pub struct TextDirectionTracker {
    pressed: HashSet<KeyCode>,
    pending: Option<TextDirection>,
    canceled: bool,
}

impl TextDirectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some() && !self.canceled
    }

    /// Feed one key event. Returns the direction to announce, if any.
    pub fn on_key(&mut self, event: &KeyEvent) -> Option<TextDirection> {
        match event.kind {
            KeyKind::Down => {
                self.pressed.insert(event.code);
                if event.code.is_shift() {
                    if let Some(direction) = self.chord_direction() {
                        self.pending = Some(direction);
                    }
                } else if !event.code.is_control() && self.pending.is_some() {
                    self.canceled = true;
                }
                None
            }
            KeyKind::Up => {
                self.pressed.remove(&event.code);
                if event.code.is_shift() || event.code.is_control() {
                    self.notify()
                } else {
                    None
                }
            }
            KeyKind::Char => None,
        }
    }

    /// Forget held keys, e.g. after focus moved away mid-chord.
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.pending = None;
        self.canceled = false;
    }

    fn notify(&mut self) -> Option<TextDirection> {
        let direction = self.pending.take();
        if std::mem::take(&mut self.canceled) {
            return None;
        }
        direction
    }

    fn chord_direction(&self) -> Option<TextDirection> {
        let control =
            self.pressed.contains(&KeyCode::ControlLeft) || self.pressed.contains(&KeyCode::ControlRight);
        if !control {
            return None;
        }
        let right = self.pressed.contains(&KeyCode::ShiftRight);
        let left = self.pressed.contains(&KeyCode::ShiftLeft);
        let direction = match (right, left) {
            (true, false) => TextDirection::RightToLeft,
            (false, true) => TextDirection::LeftToRight,
            _ => return None,
        };
        let others = self
            .pressed
            .iter()
            .any(|code| !code.is_shift() && !code.is_control());
        (!others).then_some(direction)
    }
}
