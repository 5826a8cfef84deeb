//! The semantic message channel to the remote widget.
//!
//! Outbound traffic is a [`RemoteMessage`]; the widget itself sits behind
//! [`RemoteWidget`]. The widget reference goes away when the remote process
//! dies, so the view holds it in a [`RemoteSlot`] that turns every send
//! into a no-op once emptied.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use canopy_common::types::{Color, Rect, Size};
use canopy_platform::{KeyEvent, PointerEvent, WheelEvent};
use image::RgbaImage;
use serde::Serialize;
use tracing::trace;

use crate::backing_store::BackingStoreCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionCommand {
    Set,
    Confirm,
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemoteMessage {
    SetBackground {
        width: u32,
        height: u32,
        #[serde(skip)]
        rgba: Vec<u8>,
    },
    Resize {
        size: Size,
    },
    Pointer(PointerEvent),
    Wheel(WheelEvent),
    Key(KeyEvent),
    ImeSetMode {
        enabled: bool,
    },
    ImeSetComposition {
        command: CompositionCommand,
        cursor: i32,
        target_start: i32,
        target_end: i32,
        text: String,
    },
    TextDirectionChanged {
        direction: TextDirection,
    },
    SystemThemeChanged,
    Focused,
    Blurred,
    LostCapture,
    Hidden,
    Restored,
    Shutdown,
    ViewDestroyed,
}

impl RemoteMessage {
    pub fn discard_composition() -> Self {
        RemoteMessage::ImeSetComposition {
            command: CompositionCommand::Discard,
            cursor: -1,
            target_start: -1,
            target_end: -1,
            text: String::new(),
        }
    }
}

/// Opaque reference to the root accessible object the remote side built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessibleHandle(pub u64);

/// The remote widget as seen from the view.
pub trait RemoteWidget {
    /// Queue `message` for the remote side. Returns false if the channel
    /// refused it.
    fn send(&mut self, message: RemoteMessage) -> bool;

    /// False while the remote side must keep focus (e.g. mid-drag).
    fn can_blur(&self) -> bool {
        true
    }

    /// Bring `cache` up to date with the remote side. May block on a
    /// round trip. Anything it damages lands in the next paint.
    fn refresh_backing_store(&mut self, _cache: &mut BackingStoreCache) {}

    /// Build the root accessible object for this widget.
    fn create_accessibility_root(&mut self, _root_id: i32) -> Option<AccessibleHandle> {
        None
    }
}

/// Nullable holder for the remote widget.
#[derive(Default)]
pub struct RemoteSlot {
    widget: Option<Box<dyn RemoteWidget>>,
}

impl RemoteSlot {
    pub fn new(widget: Box<dyn RemoteWidget>) -> Self {
        Self {
            widget: Some(widget),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        self.widget.is_some()
    }

    /// Send `message` if a widget is present. Returns whether it was sent.
    pub fn send(&mut self, message: RemoteMessage) -> bool {
        match self.widget.as_mut() {
            Some(widget) => widget.send(message),
            None => {
                trace!(?message, "remote widget gone, dropping message");
                false
            }
        }
    }

    pub fn can_blur(&self) -> bool {
        self.widget.as_ref().is_some_and(|w| w.can_blur())
    }

    pub fn refresh_backing_store(&mut self, cache: &mut BackingStoreCache) {
        if let Some(widget) = self.widget.as_mut() {
            widget.refresh_backing_store(cache);
        }
    }

    pub fn create_accessibility_root(&mut self, root_id: i32) -> Option<AccessibleHandle> {
        self.widget.as_mut()?.create_accessibility_root(root_id)
    }

    pub fn clear(&mut self) {
        self.widget = None;
    }
}

/// Shared state behind a [`RecordingRemote`].
#[derive(Debug, Default)]
pub struct RemoteLog {
    pub sent: Vec<RemoteMessage>,
    pub can_blur: bool,
    pub refuse_sends: bool,
    /// Replaces the backing store on the next refresh.
    pub pending_store: Option<RgbaImage>,
    /// Pixel updates applied (and damaged) on the next refresh.
    pub pending_updates: VecDeque<(Rect, Color)>,
    pub refreshes: usize,
    pub accessibility_root: Option<AccessibleHandle>,
}

impl RemoteLog {
    pub fn take_sent(&mut self) -> Vec<RemoteMessage> {
        std::mem::take(&mut self.sent)
    }
}

/// A remote widget that records what it is sent. Used by tests and the
/// replay tool.
#[derive(Debug, Clone)]
pub struct RecordingRemote {
    log: Rc<RefCell<RemoteLog>>,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(RemoteLog {
                can_blur: true,
                ..RemoteLog::default()
            })),
        }
    }

    pub fn log(&self) -> Rc<RefCell<RemoteLog>> {
        self.log.clone()
    }

    pub fn sent(&self) -> Vec<RemoteMessage> {
        self.log.borrow().sent.clone()
    }

    pub fn take_sent(&self) -> Vec<RemoteMessage> {
        self.log.borrow_mut().take_sent()
    }
}

impl Default for RecordingRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteWidget for RecordingRemote {
    fn send(&mut self, message: RemoteMessage) -> bool {
        let mut log = self.log.borrow_mut();
        if log.refuse_sends {
            return false;
        }
        log.sent.push(message);
        true
    }

    fn can_blur(&self) -> bool {
        self.log.borrow().can_blur
    }

    fn refresh_backing_store(&mut self, cache: &mut BackingStoreCache) {
        let mut log = self.log.borrow_mut();
        log.refreshes += 1;
        if let Some(store) = log.pending_store.take() {
            cache.replace(store);
        }
        while let Some((rect, color)) = log.pending_updates.pop_front() {
            cache.fill(rect, color);
            cache.damage(rect);
        }
    }

    fn create_accessibility_root(&mut self, _root_id: i32) -> Option<AccessibleHandle> {
        self.log.borrow().accessibility_root
    }
}
