pub mod config;
pub mod region;
pub mod transform;
pub mod view_box;

pub use config::{AppConfig, PaletteColorConfig, ScaleConfig, FALLBACK_PALETTE};
pub use region::{FillState, Region, RegionId};
pub use transform::{ImageTransform, TransformBounds, WHEEL_ZOOM_RATE};
pub use view_box::{Rect, ViewBox};
