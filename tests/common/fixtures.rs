//! Test fixtures and constants.

use hexmosaic::models::ImageTransform;
use hexmosaic::rendering::RasterImage;
use hexmosaic::services::RecolorSnapshot;
use mosaic_dither::{DitherMode, Palette, Rgb};

/// Three 10x10 cells in a row plus an unfilled frame.
///
/// Regions: 0, 1, 2 are the cells, 3 is the frame (`fill="none"`).
pub const STRIP_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 30 10" width="300" height="100">
  <path d="M0 0h10v10h-10z" fill="#e6e6e6"/>
  <path d="M10 0h10v10h-10z" style="fill:#d9d9d9;stroke:#999"/>
  <path d="M20 0h10v10h-10z" fill="#e6e6e6"/>
  <path d="M0 0h30v10h-30z" fill="none" stroke="#333"/>
</svg>"##;

/// Red/blue palette from the recolor scenarios.
pub fn red_blue() -> Palette {
    Palette::from_colors([Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)])
}

pub fn black_white() -> Palette {
    Palette::from_colors([Rgb::BLACK, Rgb::WHITE])
}

/// A single-color image of the given size.
pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RasterImage {
    let data: Vec<u8> = (0..width * height).flat_map(|_| rgba).collect();
    RasterImage::from_rgba(width, height, &data).unwrap()
}

/// An image with one column per color, left to right.
pub fn striped_image(columns: &[[u8; 4]]) -> RasterImage {
    let data: Vec<u8> = columns.iter().flat_map(|c| *c).collect();
    RasterImage::from_rgba(columns.len() as u32, 1, &data).unwrap()
}

pub fn snapshot(palette: Palette, mode: DitherMode) -> RecolorSnapshot {
    RecolorSnapshot {
        palette_name: "test".to_string(),
        palette,
        mode,
        transform: ImageTransform::default(),
    }
}

/// Encode RGBA pixels as a PNG file image.
pub fn png_bytes(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(rgba).unwrap();
    }
    out
}
