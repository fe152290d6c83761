//! Output types for the dithering pipeline.
//!
//! This module provides [`QuantizedBuffer`], the full-resolution result of
//! an error diffusion pass.

mod quantized_buffer;

pub use quantized_buffer::QuantizedBuffer;
