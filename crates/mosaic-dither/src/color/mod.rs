//! Color types
//!
//! This module provides the byte-level colors used for input/output and the
//! floating-point working color used while error accumulates.
//!
//! # Color Types
//!
//! - **Rgb**: An 8-bit RGB triple. Palette entries and emitted colors.
//! - **Rgba**: An 8-bit RGB triple with straight (non-premultiplied) alpha.
//!   Raster pixels and quantized output pixels.
//! - **WorkColor**: Unclamped `f32` channels on the 0..255 scale. Ordered
//!   dither offsets and diffused error are added here before matching.
//!
//! # Example
//!
//! ```
//! use mosaic_dither::{Rgb, WorkColor};
//!
//! let red: Rgb = "#eb0000".parse().unwrap();
//! let working = WorkColor::from(red) + WorkColor::splat(12.0);
//! assert_eq!(working.r, 247.0);
//! ```

mod rgb;
mod work;

pub use rgb::{Rgb, Rgba};
pub use work::WorkColor;
