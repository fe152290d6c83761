//! Dithering modes.
//!
//! Three ways to turn a sampled color into a palette color:
//!
//! - **None**: nearest palette color, no perturbation
//! - **Ordered**: 4x4 Bayer offset added before the nearest match
//! - **Floyd-Steinberg**: whole-raster error diffusion, computed once per pass
//!
//! # Example
//!
//! ```
//! use mosaic_dither::DitherMode;
//!
//! let mode: DitherMode = "floyd-steinberg".parse().unwrap();
//! assert_eq!(mode, DitherMode::FloydSteinberg);
//! assert_eq!(mode.to_string(), "floyd-steinberg");
//! ```

mod floyd_steinberg;
mod kernel;
mod ordered;

pub use floyd_steinberg::{diffuse_with_kernel, FloydSteinberg};
pub use kernel::*;
pub use ordered::{OrderedDither, BAYER_4X4, DEFAULT_STRENGTH};

use std::fmt;
use std::str::FromStr;

/// Dithering strategy used when sampling region colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DitherMode {
    /// Nearest palette color.
    #[default]
    None,

    /// Bayer 4x4 ordered dithering.
    ///
    /// Stateless per pixel, so samples are independent of each other.
    Ordered,

    /// Floyd-Steinberg error diffusion over the whole raster.
    ///
    /// Requires a [`QuantizedBuffer`](crate::QuantizedBuffer) built before the
    /// first sample of a pass.
    FloydSteinberg,
}

impl DitherMode {
    /// All modes, in menu order.
    pub const ALL: [DitherMode; 3] = [
        DitherMode::None,
        DitherMode::Ordered,
        DitherMode::FloydSteinberg,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DitherMode::None => "none",
            DitherMode::Ordered => "ordered",
            DitherMode::FloydSteinberg => "floyd-steinberg",
        }
    }

    /// Whether this mode needs the full-raster quantized buffer.
    pub fn needs_buffer(&self) -> bool {
        matches!(self, DitherMode::FloydSteinberg)
    }
}

impl fmt::Display for DitherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a dither mode name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDitherModeError {
    pub input: String,
}

impl fmt::Display for ParseDitherModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown dither mode '{}' (expected none, ordered or floyd-steinberg)",
            self.input
        )
    }
}

impl std::error::Error for ParseDitherModeError {}

impl FromStr for DitherMode {
    type Err = ParseDitherModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(DitherMode::None),
            "ordered" | "bayer" => Ok(DitherMode::Ordered),
            "floyd-steinberg" | "floyd_steinberg" | "fs" | "error-diffusion" => {
                Ok(DitherMode::FloydSteinberg)
            }
            _ => Err(ParseDitherModeError {
                input: s.to_string(),
            }),
        }
    }
}

/// Sliding window of accumulated diffusion error.
///
/// Holds only the rows the kernel can reach (`max_dy + 1`), so memory
/// stays proportional to the image width.
#[derive(Debug)]
pub struct ErrorBuffer {
    /// rows[0] is the current row, rows[1] the next.
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Error accumulated for pixel `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a pixel `row_offset` rows below the current one.
    ///
    /// Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for (acc, e) in self.rows[row_offset][x].iter_mut().zip(error) {
                *acc += e;
            }
        }
    }

    /// Drop the current row and open a zeroed one at the bottom.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}
