use canopy_common::types::{Rect, TooltipId, WindowId};

use crate::input::PointerEvent;

/// The native tooltip control.
pub trait TooltipHost {
    /// Create a tooltip owned by `owner`. Returns `None` if the control
    /// could not be created.
    fn create_tooltip(&self, owner: WindowId) -> Option<TooltipId>;
    fn is_tooltip(&self, tooltip: TooltipId) -> bool;
    fn destroy_tooltip(&self, tooltip: TooltipId);
    /// Set the hover area, in owner client coordinates. The control asks
    /// for the text when it is about to show.
    fn set_tool_rect(&self, tooltip: TooltipId, rect: Rect);
    fn set_max_width(&self, tooltip: TooltipId, pixels: u32);
    /// Hide the tooltip if it is showing.
    fn pop(&self, tooltip: TooltipId);
    /// Show the tooltip now, without waiting for the hover delay.
    fn popup(&self, tooltip: TooltipId);
    /// Forward a pointer event so the control can track hover.
    fn relay(&self, tooltip: TooltipId, event: &PointerEvent);
}
