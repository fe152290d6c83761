//! Palette types and the nearest-color quantizer
//!
//! This module provides the ordered palette used as the quantization target,
//! its entries, the built-in presets, and error types for parsing.

mod entry;
mod error;
mod palette;
mod presets;

pub use entry::PaletteEntry;
pub use error::{PaletteError, ParseColorError};
pub use palette::Palette;
pub use presets::{preset, PresetColor, BLUE, PRESET_NAMES, PURPLE};
