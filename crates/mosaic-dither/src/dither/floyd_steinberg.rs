//! Floyd-Steinberg error diffusion over a whole raster.
//!
//! The pass visits pixels in row-major order, left to right, with no
//! serpentine reversal. Fully transparent pixels are emitted as transparent
//! white and neither consume nor spread error, although they still collect
//! error from their neighbors.

use crate::color::{Rgba, WorkColor};
use crate::output::QuantizedBuffer;
use crate::palette::Palette;
use crate::raster::RasterBuffer;

use super::{ErrorBuffer, Kernel, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion.
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// Error that would land outside the raster is dropped, so edge pixels
/// propagate less than 100% of their error.
///
/// # Example
///
/// ```
/// use mosaic_dither::{FloydSteinberg, Palette, RasterBuffer, Rgb, Rgba};
///
/// let palette = Palette::from_colors([Rgb::BLACK, Rgb::WHITE]);
/// let raster = RasterBuffer::filled(4, 4, Rgba::new(128, 128, 128, 255));
/// let buffer = FloydSteinberg.build(&raster, &palette);
///
/// assert_eq!(buffer.width(), 4);
/// assert!(buffer.pixels().iter().all(|p| p.rgb() == Rgb::BLACK || p.rgb() == Rgb::WHITE));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FloydSteinberg;

impl FloydSteinberg {
    /// Quantize every pixel of `raster` against `palette`.
    pub fn build(&self, raster: &RasterBuffer, palette: &Palette) -> QuantizedBuffer {
        diffuse_with_kernel(raster, palette, &FLOYD_STEINBERG)
    }
}

/// Error diffusion with an arbitrary forward-only kernel.
///
/// Output pixels carry the matched palette color and the source alpha.
pub fn diffuse_with_kernel(
    raster: &RasterBuffer,
    palette: &Palette,
    kernel: &Kernel,
) -> QuantizedBuffer {
    let width = raster.width();
    let height = raster.height();
    let mut pixels = Vec::with_capacity(width * height);
    let mut errors = ErrorBuffer::new(width, kernel.max_dy + 1);

    for y in 0..height {
        for x in 0..width {
            let source = raster.pixel(x, y);
            if source.is_transparent() {
                pixels.push(Rgba::TRANSPARENT_WHITE);
                continue;
            }

            let [er, eg, eb] = errors.get_accumulated(x);
            let working = WorkColor::from(source.rgb()) + WorkColor::new(er, eg, eb);
            let matched = palette.nearest(working).rgb();
            pixels.push(matched.with_alpha(source.a));

            let error = working - matched;
            for &(dx, dy, weight) in kernel.entries {
                let nx = x as i64 + dx as i64;
                let ny = y + dy as usize;
                if nx < 0 || nx as usize >= width || ny >= height {
                    continue;
                }
                let share = error * kernel.fraction(weight);
                errors.add_error(nx as usize, dy as usize, [share.r, share.g, share.b]);
            }
        }
        errors.advance_row();
    }

    QuantizedBuffer::new(pixels, width, height)
}
