use canopy_common::types::{Rect, WindowId};

/// Operations on the native input method editor for one window.
pub trait InputMethod {
    /// Re-read the active input language. Returns true if it has an IME.
    fn set_input_language(&self) -> bool;
    fn create_ime_window(&self, window: WindowId);
    fn destroy_ime_window(&self, window: WindowId);
    fn update_ime_window(&self, window: WindowId);
    /// Commit or discard whatever the IME is holding.
    fn cleanup_composition(&self, window: WindowId);
    fn reset_composition(&self, window: WindowId);
    /// Attach the IME and move its candidate window to `caret`.
    fn enable_ime(&self, window: WindowId, caret: Rect, complete: bool);
    fn disable_ime(&self, window: WindowId);
}
