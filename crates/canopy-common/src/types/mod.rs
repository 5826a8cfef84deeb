pub mod color;
pub mod core;
pub mod region;

pub use color::Color;
pub use core::{Point, Rect, Size, TooltipId, WindowId};
pub use region::Region;
