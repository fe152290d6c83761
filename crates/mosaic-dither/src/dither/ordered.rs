//! Ordered (Bayer) dithering.
//!
//! Ordered dithering perturbs each pixel by a fixed, position-dependent
//! offset before nearest-color quantization. Unlike error diffusion it has no
//! state, so a single pixel can be dithered without visiting the rest of the
//! image.

use crate::color::{Rgb, WorkColor};

/// 4x4 Bayer threshold matrix, indexed `[y % 4][x % 4]`.
pub const BAYER_4X4: [[u8; 4]; 4] = [[0, 8, 2, 10], [12, 4, 14, 6], [3, 11, 1, 9], [15, 7, 13, 5]];

/// Default offset amplitude in 8-bit channel units.
pub const DEFAULT_STRENGTH: f32 = 48.0;

/// Ordered dither with a 4x4 Bayer matrix.
///
/// The offset at `(x, y)` is `(BAYER_4X4[y % 4][x % 4] / 16 - 0.5) * strength`
/// and is added to all three channels alike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedDither {
    strength: f32,
}

impl Default for OrderedDither {
    fn default() -> Self {
        Self::new(DEFAULT_STRENGTH)
    }
}

impl OrderedDither {
    pub fn new(strength: f32) -> Self {
        Self { strength }
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    /// Channel offset at pixel `(x, y)`.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> f32 {
        let threshold = BAYER_4X4[y % 4][x % 4] as f32;
        (threshold / 16.0 - 0.5) * self.strength
    }

    /// Add the offset for `(x, y)` to every channel, clamped to `[0, 255]`.
    pub fn perturb(&self, color: Rgb, x: usize, y: usize) -> WorkColor {
        let offset = self.offset(x, y);
        (WorkColor::from(color) + WorkColor::splat(offset)).clamp_channels()
    }
}
