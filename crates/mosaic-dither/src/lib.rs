#![allow(clippy::module_inception)]

//! mosaic-dither: palette quantization and dithering for mosaic recoloring
//!
//! This library turns pixels of a raster image into colors from a small fixed
//! palette. It is the color core of `hexmosaic`: every region of a vector
//! mosaic is recolored with one sample taken through this crate.
//!
//! # Quick Start
//!
//! The [`Sampler`] builder is the primary entry point:
//!
//! ```
//! use mosaic_dither::{DitherMode, Palette, RasterBuffer, Rgba, Sampler};
//!
//! let palette = Palette::from_hex(&[("red", "#ff0000"), ("blue", "#0000ff")]).unwrap();
//! let sampler = Sampler::new(palette).mode(DitherMode::None);
//!
//! let raster = RasterBuffer::filled(4, 4, Rgba::new(200, 10, 10, 255));
//! let prepared = sampler.prepare(raster);
//!
//! assert_eq!(prepared.sample(1.0, 1.0).label(), "red");
//! ```
//!
//! # Matching
//!
//! [`Palette::nearest`] uses squared Euclidean distance in 8-bit RGB. The
//! first entry wins ties. An empty palette yields white instead of an error.
//!
//! # Dithering Modes
//!
//! - [`DitherMode::None`]: nearest color only
//! - [`DitherMode::Ordered`]: 4x4 Bayer offset scaled by 48, added to every
//!   channel and clamped before matching
//! - [`DitherMode::FloydSteinberg`]: one row-major error diffusion pass over
//!   the whole raster, producing a [`QuantizedBuffer`] shared by all samples
//!   of a pass
//!
//! Fully transparent pixels sample as white in every mode.
//!
//! ## Floyd-Steinberg edges
//!
//! Error that would flow outside the raster is dropped rather than
//! renormalized onto the neighbors that exist:
//!
//! ```text
//!            X   7/16
//!   3/16   5/16  1/16
//! ```
//!
//! Interior pixels pass on all of their error. A pixel in the first column
//! loses the 3/16 share, one in the last column loses 8/16, and the last row
//! keeps only the 7/16 share to the right.

pub mod api;
pub mod color;
pub mod dither;
pub mod output;
pub mod palette;
pub mod raster;


pub use api::{DitherError, PreparedSampler, Sampler};
pub use color::{Rgb, Rgba, WorkColor};
pub use dither::{DitherMode, FloydSteinberg, OrderedDither, ParseDitherModeError};
pub use output::QuantizedBuffer;
pub use palette::{Palette, PaletteEntry, PaletteError, ParseColorError};
pub use raster::RasterBuffer;
