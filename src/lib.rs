//! hexmosaic - recolor hexagon mosaics from a photo
//!
//! Samples an image under each region of an SVG mosaic, quantizes it to a
//! small palette (optionally dithered) and writes the colors back as fills.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
