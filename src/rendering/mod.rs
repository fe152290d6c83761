pub mod layout;
pub mod raster;
pub mod svg_to_png;

pub use layout::{UsvgLayout, DEFAULT_DISPLAY_WIDTH};
pub use raster::RasterImage;
pub use svg_to_png::PreviewRenderer;
