//! Sampling raster.
//!
//! [`RasterBuffer`] is the straight-alpha RGBA bitmap the quantizer reads
//! from: the overlaid image after it has been rendered at its current
//! placement into ViewBox-sized pixels.

use crate::api::DitherError;
use crate::color::{Rgb, Rgba};

/// A row-major RGBA8 bitmap with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl RasterBuffer {
    /// Wrap raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::BufferSize`] if `data.len() != width * height * 4`.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> Result<Self, DitherError> {
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(DitherError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A buffer filled with one color.
    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        let data = color
            .to_bytes()
            .iter()
            .copied()
            .cycle()
            .take(width * height * 4)
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// Build a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Rgba) -> Self {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y).to_bytes());
            }
        }
        Self {
            data,
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

    /// True when either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read one pixel. Coordinates must be in bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let offset = (y * self.width + x) * 4;
        let px = &self.data[offset..offset + 4];
        Rgba::new(px[0], px[1], px[2], px[3])
    }

    /// Opaque color of a pixel, ignoring alpha.
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> Rgb {
        self.pixel(x, y).rgb()
    }

    /// Snap a fractional coordinate to the nearest pixel inside the buffer.
    ///
    /// Rounds half up, then clamps into `[0, w-1] x [0, h-1]`. Returns `None`
    /// for an empty buffer.
    pub fn snap(&self, x: f32, y: f32) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }
        Some((
            snap_axis(x, self.width),
            snap_axis(y, self.height),
        ))
    }
}

#[inline]
fn snap_axis(v: f32, len: usize) -> usize {
    // NaN casts to 0
    let rounded = (v + 0.5).floor() as i64;
    rounded.clamp(0, len as i64 - 1) as usize
}
