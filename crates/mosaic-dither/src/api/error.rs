//! Unified error type for the mosaic-dither public API.
//!
//! [`DitherError`] wraps all error types from the crate into a single enum
//! for convenient `?` propagation in application code.

use crate::dither::ParseDitherModeError;
use crate::palette::{PaletteError, ParseColorError};
use std::fmt;

/// Unified error type for the mosaic-dither public API.
///
/// # Example
///
/// ```
/// use mosaic_dither::{DitherError, DitherMode, Palette};
///
/// fn configure(preset: &str, mode: &str) -> Result<(Palette, DitherMode), DitherError> {
///     Ok((Palette::preset(preset)?, mode.parse()?))
/// }
///
/// assert!(configure("blue", "ordered").is_ok());
/// assert!(configure("green", "ordered").is_err());
/// ```
#[derive(Debug)]
pub enum DitherError {
    /// Palette construction error (unknown preset or bad color)
    Palette(PaletteError),
    /// Color parsing error (invalid hex string)
    ParseColor(ParseColorError),
    /// Unrecognized dither mode name
    ParseMode(ParseDitherModeError),
    /// Raw pixel data does not match the stated dimensions
    BufferSize { expected: usize, actual: usize },
}

impl fmt::Display for DitherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherError::Palette(err) => write!(f, "palette error: {}", err),
            DitherError::ParseColor(err) => write!(f, "color parse error: {}", err),
            DitherError::ParseMode(err) => write!(f, "{}", err),
            DitherError::BufferSize { expected, actual } => write!(
                f,
                "pixel buffer has {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for DitherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DitherError::Palette(err) => Some(err),
            DitherError::ParseColor(err) => Some(err),
            DitherError::ParseMode(err) => Some(err),
            DitherError::BufferSize { .. } => None,
        }
    }
}

impl From<PaletteError> for DitherError {
    fn from(err: PaletteError) -> Self {
        DitherError::Palette(err)
    }
}

impl From<ParseColorError> for DitherError {
    fn from(err: ParseColorError) -> Self {
        DitherError::ParseColor(err)
    }
}

impl From<ParseDitherModeError> for DitherError {
    fn from(err: ParseDitherModeError) -> Self {
        DitherError::ParseMode(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_buffer_size_message() {
        let err = DitherError::BufferSize {
            expected: 16,
            actual: 12,
        };
        assert_eq!(err.to_string(), "pixel buffer has 12 bytes, expected 16");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_parse_mode_has_source() {
        let err: DitherError = "sideways".parse::<crate::DitherMode>().unwrap_err().into();
        assert!(err.to_string().contains("sideways"));
        assert!(err.source().is_some());
    }
}
