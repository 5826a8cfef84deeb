//! Native platform seams for the view controller.
//!
//! The controller never talks to a windowing system directly. Each native
//! collaborator sits behind a trait:
//! - [`WindowSystem`]: window tree, placement transactions, capture, focus
//! - [`TooltipHost`]: the native tooltip control
//! - [`InputMethod`]: IME windows and composition housekeeping
//! - [`KeyboardLayouts`]: installed keyboard layouts
//! - [`PluginProcessRegistry`]: the registry of running plugin processes
//! - [`PaintTarget`]: the surface a paint pass draws into
//!
//! [`headless::HeadlessPlatform`] implements all of them in memory.

pub mod headless;
pub mod ime;
pub mod input;
pub mod keyboard;
pub mod paint;
pub mod plugin_registry;
pub mod tooltip;
pub mod window;

use std::rc::Rc;

pub use headless::HeadlessPlatform;
pub use ime::InputMethod;
pub use input::{
    KeyCode, KeyEvent, KeyKind, Modifiers, MouseButton, PointerEvent, PointerKind, WheelEvent,
};
pub use keyboard::{KeyboardLayouts, LanguageId};
pub use paint::PaintTarget;
pub use plugin_registry::{PluginProcessRegistry, RegistrationOutcome};
pub use tooltip::TooltipHost;
pub use window::{CursorKind, ResizeCorner, WindowKind, WindowPlacement, WindowSystem};

pub type Result<T> = std::result::Result<T, canopy_common::PlatformError>;

/// The set of native services a view is wired to.
///
/// All views on the UI thread share one `Platform`; cloning only bumps
/// reference counts.
#[derive(Clone)]
pub struct Platform {
    pub windows: Rc<dyn WindowSystem>,
    pub tooltips: Rc<dyn TooltipHost>,
    pub ime: Rc<dyn InputMethod>,
    pub keyboard: Rc<dyn KeyboardLayouts>,
    pub plugins: Rc<dyn PluginProcessRegistry>,
}

impl Platform {
    /// Wire every service to one headless backend.
    pub fn headless(backend: Rc<HeadlessPlatform>) -> Self {
        Self {
            windows: backend.clone(),
            tooltips: backend.clone(),
            ime: backend.clone(),
            keyboard: backend.clone(),
            plugins: backend,
        }
    }
}
