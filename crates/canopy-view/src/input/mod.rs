//! Turns raw pointer, key and wheel callbacks into remote messages.
//!
//! Before anything reaches the remote side the router applies the local
//! interception rules: parent pre-handling, popup dismissal, resize-corner
//! drags, wheel rerouting, Enter filtering and the right-to-left direction
//! shortcut.

mod keyboard;
mod router;


use serde::Serialize;

pub use keyboard::{EnterKeyFilter, TextDirectionTracker};
pub use router::{InputRouter, RouteContext};

/// Who swallowed an event that never reached the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumedBy {
    Parent,
    Reroute,
    ResizeDrag,
    PopupDismissal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputOutcome {
    Forwarded,
    Consumed(ConsumedBy),
    /// Filtered out, or no remote widget to send to.
    Dropped,
}

impl InputOutcome {
    pub fn is_forwarded(self) -> bool {
        self == InputOutcome::Forwarded
    }
}
