pub mod errors;
pub mod types;

pub use errors::{CanopyError, ConfigError, PlatformError};
pub use types::{Color, Point, Rect, Region, Size, TooltipId, WindowId};

pub type Result<T> = std::result::Result<T, CanopyError>;
