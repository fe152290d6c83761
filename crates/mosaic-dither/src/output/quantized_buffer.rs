//! QuantizedBuffer: the dense output of one error diffusion pass.
//!
//! Every pixel holds a palette color (or transparent white) plus the
//! source alpha. The buffer is built once per recolor pass and then read
//! by every region sample in that pass.

use crate::color::Rgba;

/// Discrete RGBA pixels at raster resolution, row-major.
///
/// # Example
///
/// ```
/// use mosaic_dither::{QuantizedBuffer, Rgba};
///
/// let px = Rgba::new(255, 0, 0, 255);
/// let buffer = QuantizedBuffer::new(vec![px; 4], 2, 2);
///
/// assert_eq!(buffer.width(), 2);
/// assert_eq!(buffer.pixel(1, 1), px);
/// assert_eq!(buffer.to_rgba_bytes().len(), 2 * 2 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedBuffer {
    /// Output pixels, one per source pixel, row-major order.
    pixels: Vec<Rgba>,
    /// Image width in pixels.
    width: usize,
    /// Image height in pixels.
    height: usize,
}

impl QuantizedBuffer {
    /// Wrap quantized pixels.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `pixels.len() == width * height`.
    pub fn new(pixels: Vec<Rgba>, width: usize, height: usize) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width * height,
            "pixel count ({}) must match width * height ({}x{}={})",
            pixels.len(),
            width,
            height,
            width * height,
        );
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Read one output pixel. Coordinates must be in bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.width + x]
    }

    /// Flatten to `[R, G, B, A, ...]` bytes, e.g. for a debug PNG.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_bytes()).collect()
    }
}
