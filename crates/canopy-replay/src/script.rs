//! Replay script format.
//!
//! A script is one JSON document: the window layout followed by a list of
//! steps. Native events use the same shape the view host accepts, tagged
//! with `"op": "native"`.
//!
//! ```json
//! {
//!   "view": { "x": 0, "y": 40, "width": 800, "height": 560 },
//!   "steps": [
//!     { "op": "store", "width": 800, "height": 560, "color": "#336699" },
//!     { "op": "native", "event": "key", "kind": "char", "code": { "char": "a" } },
//!     { "op": "advance", "ms": 250 }
//!   ]
//! }
//! ```

use std::path::Path;

use canopy_common::types::{Color, Rect, Size, WindowId};
use canopy_common::CanopyError;
use canopy_platform::{CursorKind, RegistrationOutcome};
use canopy_view::{ImeControl, NativeEvent, PluginGeometry};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default = "default_top_level")]
    pub top_level: Rect,
    #[serde(default = "default_view")]
    pub view: Rect,
    /// Create the view as an auto-dismiss popup instead of a child.
    #[serde(default)]
    pub popup: Option<PopupSpec>,
    #[serde(default)]
    pub rtl_ui: bool,
    /// Install a right-to-left keyboard layout.
    #[serde(default)]
    pub rtl_layout: bool,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopupSpec {
    #[serde(default = "yes")]
    pub activatable: bool,
}

fn yes() -> bool {
    true
}

fn default_top_level() -> Rect {
    Rect::new(0, 0, 800, 600)
}

fn default_view() -> Rect {
    Rect::new(0, 40, 800, 560)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Native(NativeEvent),
    /// Let virtual time pass, running deferred tasks as they fall due.
    Advance { ms: u64 },
    Resize { size: Size },
    Hide,
    Show,
    Focus,
    Blur,
    Cursor { cursor: CursorKind },
    Loading { loading: bool },
    /// Move the pointer to screen coordinates.
    PointerAt {
        x: i32,
        y: i32,
        #[serde(default = "yes")]
        over_view: bool,
    },
    Resizer { rect: Rect },
    Tooltip { text: String },
    Deemphasize { on: bool },
    Background { width: u32, height: u32, color: String },
    /// The remote side delivers a whole new backing store.
    Store { width: u32, height: u32, color: String },
    /// The remote side repaints `rect`.
    Update { rect: Rect, color: String },
    Scroll { rect: Rect, dx: i32, dy: i32 },
    /// A plugin process creates a window under the view.
    SpawnPlugin { rect: Rect },
    Plugins { batch: Vec<PluginGeometry> },
    /// The plugin process tears down an intermediate window.
    ReleaseIntermediate { window: WindowId },
    /// A window vanishes without notice, as when its process dies.
    KillWindow { window: WindowId },
    /// Queue the registry's answer to the next registration attempt.
    Registration { outcome: RegistrationOutcome },
    ImeStatus { control: ImeControl, caret: Rect },
    WidgetGone,
    RemoteGone,
    Destroy,
    Close,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Native(_) => "native",
            Step::Advance { .. } => "advance",
            Step::Resize { .. } => "resize",
            Step::Hide => "hide",
            Step::Show => "show",
            Step::Focus => "focus",
            Step::Blur => "blur",
            Step::Cursor { .. } => "cursor",
            Step::Loading { .. } => "loading",
            Step::PointerAt { .. } => "pointer_at",
            Step::Resizer { .. } => "resizer",
            Step::Tooltip { .. } => "tooltip",
            Step::Deemphasize { .. } => "deemphasize",
            Step::Background { .. } => "background",
            Step::Store { .. } => "store",
            Step::Update { .. } => "update",
            Step::Scroll { .. } => "scroll",
            Step::SpawnPlugin { .. } => "spawn_plugin",
            Step::Plugins { .. } => "plugins",
            Step::ReleaseIntermediate { .. } => "release_intermediate",
            Step::KillWindow { .. } => "kill_window",
            Step::Registration { .. } => "registration",
            Step::ImeStatus { .. } => "ime_status",
            Step::WidgetGone => "widget_gone",
            Step::RemoteGone => "remote_gone",
            Step::Destroy => "destroy",
            Step::Close => "close",
        }
    }
}

pub fn parse_color(hex: &str) -> Result<Color, CanopyError> {
    Color::from_hex(hex).ok_or_else(|| CanopyError::Replay(format!("invalid color: {hex}")))
}

pub fn from_json_str(content: &str) -> Result<Script, CanopyError> {
    serde_json::from_str(content).map_err(|e| CanopyError::Replay(e.to_string()))
}

pub fn load(path: &Path) -> Result<Script, CanopyError> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
        .map_err(|e| CanopyError::Replay(format!("{}: {e}", path.display())))
}
