//! Public API for the mosaic-dither crate.
//!
//! This module provides the high-level API: the [`Sampler`] builder, the
//! per-pass [`PreparedSampler`] and the [`DitherError`] unified error type.

mod error;
mod sampler;

pub use error::DitherError;
pub use sampler::{PreparedSampler, Sampler};
