//! Error diffusion kernel definitions.
//!
//! A kernel specifies how the quantization error of one pixel is spread over
//! the neighbors that have not been visited yet in row-major order.

/// An error diffusion kernel.
///
/// Each entry is an offset `(dx, dy)` and a weight. A neighbor receives
/// `error * weight / divisor`. Neighbors that fall outside the image are
/// skipped and their share of the error is lost.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries for error diffusion.
    ///
    /// - `dx`: horizontal offset (positive = right)
    /// - `dy`: vertical offset (0 = current row, 1 = next row)
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,

    /// Maximum dy value in entries.
    ///
    /// The error buffer keeps `max_dy + 1` rows.
    pub max_dy: usize,
}

impl Kernel {
    /// Weight of a single entry as a fraction of the whole error.
    #[inline]
    pub fn fraction(&self, weight: u8) -> f32 {
        weight as f32 / self.divisor as f32
    }

    /// Fraction of the error that stays inside a `width x height` image
    /// when diffused from `(x, y)`.
    pub fn retained_fraction(&self, x: usize, y: usize, width: usize, height: usize) -> f32 {
        self.entries
            .iter()
            .filter(|&&(dx, dy, _)| {
                let nx = x as i64 + dx as i64;
                let ny = y as i64 + dy as i64;
                nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height
            })
            .map(|&(_, _, w)| self.fraction(w))
            .sum()
    }
}

/// Floyd-Steinberg dithering kernel.
///
/// Distributes error to 4 neighbors with 100% total propagation (16/16).
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
    max_dy: 1,
};
