//! Sampler builder: the entry point for turning raster pixels into palette
//! entries.
//!
//! [`Sampler`] holds the live configuration (palette, mode, ordered
//! strength). [`Sampler::prepare`] freezes that configuration together with
//! one raster into a [`PreparedSampler`], which every region sample of a
//! recolor pass then reads. Changing the `Sampler` afterwards does not
//! affect a pass already prepared.

use crate::color::WorkColor;
use crate::dither::{DitherMode, FloydSteinberg, OrderedDither};
use crate::output::QuantizedBuffer;
use crate::palette::{Palette, PaletteEntry};
use crate::raster::RasterBuffer;

/// Live sampling configuration.
///
/// # Example
///
/// ```
/// use mosaic_dither::{DitherMode, Palette, RasterBuffer, Rgba, Sampler};
///
/// let sampler = Sampler::new(Palette::preset("blue").unwrap())
///     .mode(DitherMode::Ordered);
///
/// let raster = RasterBuffer::filled(4, 4, Rgba::new(0, 0, 0, 0));
/// let prepared = sampler.prepare(raster);
///
/// // Transparent pixels always sample as white.
/// assert_eq!(prepared.sample(1.2, 2.7).hex(), "#ffffff");
/// ```
#[derive(Debug, Clone)]
pub struct Sampler {
    palette: Palette,
    mode: DitherMode,
    ordered: OrderedDither,
}

impl Sampler {
    /// Create a sampler with the given palette and no dithering.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            mode: DitherMode::None,
            ordered: OrderedDither::default(),
        }
    }

    /// Set the dithering mode.
    #[inline]
    pub fn mode(mut self, mode: DitherMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the ordered dither amplitude in channel units.
    #[inline]
    pub fn strength(mut self, strength: f32) -> Self {
        self.ordered = OrderedDither::new(strength);
        self
    }

    /// Replace the palette in place.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Replace the mode in place.
    pub fn set_mode(&mut self, mode: DitherMode) {
        self.mode = mode;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn dither_mode(&self) -> DitherMode {
        self.mode
    }

    /// Snapshot the configuration and bind it to `raster`.
    ///
    /// In Floyd-Steinberg mode this runs the full error diffusion pass once.
    pub fn prepare(&self, raster: RasterBuffer) -> PreparedSampler {
        let quantized = self
            .mode
            .needs_buffer()
            .then(|| FloydSteinberg.build(&raster, &self.palette));
        PreparedSampler {
            palette: self.palette.clone(),
            mode: self.mode,
            ordered: self.ordered,
            raster,
            quantized,
        }
    }
}

/// A frozen palette, mode and raster for one recolor pass.
#[derive(Debug, Clone)]
pub struct PreparedSampler {
    palette: Palette,
    mode: DitherMode,
    ordered: OrderedDither,
    raster: RasterBuffer,
    quantized: Option<QuantizedBuffer>,
}

impl PreparedSampler {
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn mode(&self) -> DitherMode {
        self.mode
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    /// The diffusion output, present only in Floyd-Steinberg mode.
    pub fn quantized(&self) -> Option<&QuantizedBuffer> {
        self.quantized.as_ref()
    }

    /// Palette entry for the raster point `(x, y)`.
    ///
    /// The point is snapped to the nearest pixel and clamped into the raster.
    /// Transparent pixels, an empty raster and an empty palette all yield
    /// white.
    pub fn sample(&self, x: f32, y: f32) -> &PaletteEntry {
        let Some((ix, iy)) = self.raster.snap(x, y) else {
            return PaletteEntry::white();
        };

        if let Some(buffer) = &self.quantized {
            let px = buffer.pixel(ix, iy);
            if px.is_transparent() {
                return PaletteEntry::white();
            }
            return self.palette.nearest(WorkColor::from(px.rgb()));
        }

        let px = self.raster.pixel(ix, iy);
        if px.is_transparent() {
            return PaletteEntry::white();
        }
        let color = match self.mode {
            DitherMode::Ordered => self.ordered.perturb(px.rgb(), ix, iy),
            _ => WorkColor::from(px.rgb()),
        };
        self.palette.nearest(color)
    }
}
