//! Ordered palette with nearest-color matching.
//!
//! Matching is plain squared Euclidean distance in 8-bit RGB space. The
//! palette list order only matters for ties: the first entry encountered
//! with the minimum distance wins.

use super::entry::PaletteEntry;
use super::error::PaletteError;
use super::presets::{preset, PresetColor};
use crate::color::{Rgb, WorkColor};

/// An ordered list of reference colors used as quantization targets.
///
/// A palette may be empty. Matching against an empty palette is a defined
/// degenerate case that yields white (see [`Palette::nearest`]).
///
/// Palettes are cheap to clone and carry no cached distances, so swapping
/// the active palette at runtime is a plain reassignment.
///
/// # Example
///
/// ```
/// use mosaic_dither::{Palette, Rgb, WorkColor};
///
/// let palette = Palette::from_hex(&[("red", "#ff0000"), ("blue", "#0000ff")]).unwrap();
/// let entry = palette.nearest(WorkColor::from(Rgb::new(200, 10, 10)));
/// assert_eq!(entry.label(), "red");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Create a palette from entries, keeping their order.
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    /// Create a palette from `(label, hex)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] naming the first entry whose hex
    /// string does not parse.
    pub fn from_hex(colors: &[(&str, &str)]) -> Result<Self, PaletteError> {
        let entries = colors
            .iter()
            .enumerate()
            .map(|(index, (label, hex))| {
                PaletteEntry::from_hex(*label, hex)
                    .map_err(|source| PaletteError::ParseColor { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(entries))
    }

    /// Create a palette from bare colors, each labelled by its hex form.
    pub fn from_colors(colors: impl IntoIterator<Item = Rgb>) -> Self {
        Self::new(
            colors
                .into_iter()
                .map(|rgb| PaletteEntry::new(rgb.to_hex(), rgb))
                .collect(),
        )
    }

    /// Build one of the built-in presets (`purple`, `blue`).
    pub fn preset(name: &str) -> Result<Self, PaletteError> {
        let colors = preset(name).ok_or_else(|| PaletteError::UnknownPreset {
            name: name.to_string(),
        })?;
        Self::from_preset(colors)
    }

    /// Build a palette from a preset table.
    pub fn from_preset(colors: &[PresetColor]) -> Result<Self, PaletteError> {
        let pairs: Vec<(&str, &str)> = colors.iter().map(|c| (c.name, c.hex)).collect();
        Self::from_hex(&pairs)
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&PaletteEntry> {
        self.entries.get(idx)
    }

    /// Index of the nearest entry, or `None` for an empty palette.
    ///
    /// Ties resolve to the lowest index.
    #[inline]
    pub fn nearest_index(&self, color: WorkColor) -> Option<usize> {
        // Linear scan - palettes here hold a handful of colors
        let mut best: Option<(usize, f32)> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            let dist = color.distance_squared(entry.rgb());
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((i, dist)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Find the nearest palette entry to a (possibly out-of-range) color.
    ///
    /// Fails closed: an empty palette returns white instead of an error.
    #[inline]
    pub fn nearest(&self, color: WorkColor) -> &PaletteEntry {
        match self.nearest_index(color) {
            Some(i) => &self.entries[i],
            None => PaletteEntry::white(),
        }
    }

    /// Convenience wrapper around [`nearest`](Self::nearest) for byte colors.
    #[inline]
    pub fn nearest_rgb(&self, color: Rgb) -> &PaletteEntry {
        self.nearest(WorkColor::from(color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BLUE, PURPLE};

    fn red_blue() -> Palette {
        Palette::from_hex(&[("red", "#ff0000"), ("blue", "#0000ff")]).unwrap()
    }

    #[test]
    fn test_from_hex_keeps_order_and_labels() {
        let palette = red_blue();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.entries()[0].label(), "red");
        assert_eq!(palette.entries()[1].rgb(), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_from_hex_reports_index_of_bad_entry() {
        let result = Palette::from_hex(&[("ok", "#000"), ("bad", "#zzzzzz")]);
        assert!(matches!(
            result,
            Err(PaletteError::ParseColor { index: 1, .. })
        ));
    }

    #[test]
    fn test_nearest_reddish_is_red() {
        let palette = red_blue();
        assert_eq!(palette.nearest_rgb(Rgb::new(200, 10, 10)).hex(), "#ff0000");
        assert_eq!(palette.nearest_rgb(Rgb::new(10, 10, 200)).hex(), "#0000ff");
    }

    #[test]
    fn test_nearest_exact_match() {
        let palette = Palette::preset("purple").unwrap();
        for entry in palette.entries() {
            assert_eq!(palette.nearest_rgb(entry.rgb()), entry);
        }
    }

    #[test]
    fn test_tie_resolves_to_first_listed() {
        // Black is exactly 255^2 away from both entries
        let palette = Palette::from_colors([Rgb::new(255, 0, 0), Rgb::new(0, 255, 0)]);
        assert_eq!(palette.nearest_index(WorkColor::splat(0.0)), Some(0));

        let swapped = Palette::from_colors([Rgb::new(0, 255, 0), Rgb::new(255, 0, 0)]);
        assert_eq!(
            swapped.nearest_rgb(Rgb::BLACK).rgb(),
            Rgb::new(0, 255, 0),
            "order decides ties"
        );
    }

    #[test]
    fn test_empty_palette_returns_white() {
        let palette = Palette::default();
        assert!(palette.is_empty());
        assert_eq!(palette.nearest_index(WorkColor::splat(10.0)), None);
        let entry = palette.nearest(WorkColor::new(0.0, 0.0, 0.0));
        assert_eq!(entry.rgb(), Rgb::WHITE);
        assert_eq!(entry.hex(), "#ffffff");
    }

    #[test]
    fn test_out_of_range_working_colors_still_match() {
        let palette = Palette::from_colors([Rgb::BLACK, Rgb::WHITE]);
        assert_eq!(palette.nearest(WorkColor::splat(-80.0)).rgb(), Rgb::BLACK);
        assert_eq!(palette.nearest(WorkColor::splat(400.0)).rgb(), Rgb::WHITE);
    }

    #[test]
    fn test_presets() {
        let purple = Palette::preset("purple").unwrap();
        let blue = Palette::preset("BLUE").unwrap();
        assert_eq!(purple.len(), PURPLE.len());
        assert_eq!(blue.len(), BLUE.len());
        assert_eq!(purple.entries()[1].hex(), "#6432aa");
        assert_eq!(blue.entries()[1].hex(), "#0000ff");
        assert!(matches!(
            Palette::preset("green"),
            Err(PaletteError::UnknownPreset { .. })
        ));
    }

    #[test]
    fn test_from_colors_labels_by_hex() {
        let palette = Palette::from_colors([Rgb::new(0xeb, 0, 0)]);
        assert_eq!(palette.entries()[0].label(), "#eb0000");
    }
}
