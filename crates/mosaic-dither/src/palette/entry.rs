//! A single labelled palette color.

use std::sync::OnceLock;

use super::error::ParseColorError;
use crate::color::Rgb;

/// One palette color: a human label, the RGB triple, and its canonical hex.
///
/// The hex form is computed once at construction since it is what gets
/// written back into region fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    label: String,
    rgb: Rgb,
    hex: String,
}

impl PaletteEntry {
    /// Create an entry from a label and color.
    pub fn new(label: impl Into<String>, rgb: Rgb) -> Self {
        Self {
            label: label.into(),
            rgb,
            hex: rgb.to_hex(),
        }
    }

    /// Create an entry from a label and a hex string (`#rgb` or `#rrggbb`).
    ///
    /// # Example
    ///
    /// ```
    /// use mosaic_dither::{PaletteEntry, Rgb};
    ///
    /// let entry = PaletteEntry::from_hex("golden yellow", "#FFE100").unwrap();
    /// assert_eq!(entry.rgb(), Rgb::new(255, 225, 0));
    /// assert_eq!(entry.hex(), "#ffe100");
    /// ```
    pub fn from_hex(label: impl Into<String>, hex: &str) -> Result<Self, ParseColorError> {
        Ok(Self::new(label, hex.parse()?))
    }

    /// The shared white entry returned when there is nothing to match against.
    pub fn white() -> &'static PaletteEntry {
        static WHITE: OnceLock<PaletteEntry> = OnceLock::new();
        WHITE.get_or_init(|| PaletteEntry::new("white", Rgb::WHITE))
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    /// Canonical lowercase `#rrggbb`.
    #[inline]
    pub fn hex(&self) -> &str {
        &self.hex
    }
}
