//! Interactive recolor session.
//!
//! A [`Session`] owns everything a user manipulates: the loaded mosaic, the
//! overlaid image and its placement, the active palette and dither mode, and
//! the status line. Settings changes schedule a debounced recolor; the host
//! calls [`Session::poll`] to run it once due.

use mosaic_dither::{DitherMode, Palette, RasterBuffer};
use std::time::Duration;

use crate::error::{DocumentError, RecolorError, RenderError};
use crate::models::{AppConfig, ImageTransform, TransformBounds};
use crate::rendering::{PreviewRenderer, RasterImage, UsvgLayout};
use crate::services::geometry::LayoutProbe;
use crate::services::pipeline::{PassContext, RecolorPipeline, RecolorReport, RecolorSnapshot};
use crate::services::scheduler::{Clock, Debouncer, MonotonicClock};
use crate::services::svg_document::SvgDocument;

/// Palette name used for colors taken from the document itself.
pub const DOCUMENT_PALETTE: &str = "document";

/// What asked for a recolor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecolorTrigger {
    ImageLoaded,
    PaletteChanged,
    DitherChanged,
    TransformChanged,
    Explicit,
}

pub struct Session<C: Clock = MonotonicClock> {
    config: AppConfig,
    document: Option<SvgDocument>,
    image: Option<RasterImage>,
    layout: Box<dyn LayoutProbe + Send>,
    palette_name: String,
    palette: Palette,
    dither: DitherMode,
    transform: ImageTransform,
    bounds: TransformBounds,
    status: String,
    debouncer: Debouncer<RecolorTrigger>,
    pipeline: RecolorPipeline,
    clock: C,
    last_report: Option<RecolorReport>,
}

impl<C: Clock> Session<C> {
    pub fn new(config: AppConfig, clock: C) -> Self {
        let (palette_name, palette) = config.palette_or_fallback(&config.default_palette);
        let dither = config.dither_mode();
        let bounds = TransformBounds {
            scale_min: config.scale.min,
            scale_max: config.scale.max,
            ..TransformBounds::default()
        };
        let pipeline = RecolorPipeline::new(config.layout_retry_limit);
        Self {
            config,
            document: None,
            image: None,
            layout: Box::new(UsvgLayout::unmeasured()),
            palette_name,
            palette,
            dither,
            transform: ImageTransform::default(),
            bounds,
            status: RecolorError::DocumentNotLoaded.to_string(),
            debouncer: Debouncer::new(),
            pipeline,
            clock,
            last_report: None,
        }
    }

    /// Load a mosaic. On failure the previous document stays loaded.
    ///
    /// A document that cannot be laid out is rejected here, since waiting
    /// for its layout would never resolve.
    pub fn load_document(&mut self, text: &str) -> Result<(), DocumentError> {
        let loaded = SvgDocument::parse(text).and_then(|document| {
            let layout = UsvgLayout::measure(&document, self.config.display_width)?;
            Ok((document, layout))
        });
        let (document, layout) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(%e, "Could not load SVG");
                self.status = "Could not load the SVG file.".to_string();
                return Err(e);
            }
        };

        let view_box = document.view_box();
        self.bounds = TransformBounds::for_view_box(
            &view_box,
            self.config.translate_range,
            self.config.scale.min,
            self.config.scale.max,
        );
        self.transform = self.bounds.clamp(self.transform);
        self.layout = Box::new(layout);
        tracing::info!(
            regions = document.len(),
            recolorable = document.recolorable().len(),
            width = view_box.width,
            height = view_box.height,
            "SVG loaded"
        );
        self.document = Some(document);
        self.status = "SVG loaded. Upload an image to begin.".to_string();
        if self.image.is_some() {
            self.request_recolor(RecolorTrigger::Explicit);
        }
        Ok(())
    }

    /// Replace the layout probe used for geometry.
    pub fn set_layout(&mut self, layout: Box<dyn LayoutProbe + Send>) {
        self.layout = layout;
    }

    /// Install a decoded image, reset its placement and recolor right away.
    pub fn install_image(&mut self, image: RasterImage) {
        tracing::info!(width = image.width(), height = image.height(), "Image loaded");
        self.image = Some(image);
        self.transform = self.bounds.clamp(ImageTransform::default());
        self.status = "Image loaded. Applying colors...".to_string();
        self.schedule(RecolorTrigger::ImageLoaded, Duration::ZERO);
    }

    /// Decode and install an image. On failure the prior image is kept.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<(), RenderError> {
        match RasterImage::decode(bytes) {
            Ok(image) => {
                self.install_image(image);
                Ok(())
            }
            Err(e) => {
                self.image_failed(&e);
                Err(e)
            }
        }
    }

    /// Record a failed decode that ran elsewhere.
    pub fn image_failed(&mut self, error: &RenderError) {
        tracing::warn!(%error, "Could not load image");
        self.status = "Could not load that image.".to_string();
    }

    /// Switch to a named palette. Unknown names fall back to purple.
    /// Returns the name in effect.
    pub fn set_palette(&mut self, name: &str) -> &str {
        let (name, palette) = self.config.palette_or_fallback(name);
        self.palette_name = name;
        self.palette = palette;
        self.settings_changed(RecolorTrigger::PaletteChanged);
        &self.palette_name
    }

    /// Use the document's own original fills as the palette.
    pub fn use_document_palette(&mut self) -> Result<(), RecolorError> {
        let document = self
            .document
            .as_ref()
            .ok_or(RecolorError::DocumentNotLoaded)?;
        self.palette = document.document_palette();
        self.palette_name = DOCUMENT_PALETTE.to_string();
        tracing::info!(colors = self.palette.len(), "Using document palette");
        self.settings_changed(RecolorTrigger::PaletteChanged);
        Ok(())
    }

    pub fn set_dither(&mut self, mode: DitherMode) {
        self.dither = mode;
        self.settings_changed(RecolorTrigger::DitherChanged);
    }

    /// Set the image placement, clamped to bounds.
    pub fn set_transform(&mut self, transform: ImageTransform) {
        self.transform = self.bounds.clamp(transform);
        self.settings_changed(RecolorTrigger::TransformChanged);
    }

    /// Drag the image by display pixels. Ignored without an image or before
    /// layout is measurable.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if self.image.is_none() {
            return;
        }
        let Some(document) = self.document.as_ref() else {
            return;
        };
        let moved = self.bounds.pan_by_display(
            self.transform,
            dx,
            dy,
            self.layout.document_bounds(),
            &document.view_box(),
        );
        if let Some(transform) = moved {
            self.transform = transform;
            self.request_recolor(RecolorTrigger::TransformChanged);
        }
    }

    /// Mouse wheel zoom. Ignored without an image.
    pub fn zoom(&mut self, delta_y: f32) {
        if self.image.is_none() {
            return;
        }
        self.transform = self.bounds.zoom_by_wheel(self.transform, delta_y);
        self.request_recolor(RecolorTrigger::TransformChanged);
    }

    /// Schedule a recolor after the configured debounce delay.
    pub fn request_recolor(&mut self, trigger: RecolorTrigger) {
        self.schedule(trigger, Duration::from_millis(self.config.debounce_ms));
    }

    fn settings_changed(&mut self, trigger: RecolorTrigger) {
        if self.image.is_some() {
            self.request_recolor(trigger);
        }
    }

    fn schedule(&mut self, trigger: RecolorTrigger, delay: Duration) {
        let replaced = self.debouncer.schedule(self.clock.now(), delay, trigger);
        tracing::debug!(?trigger, delay_ms = delay.as_millis() as u64, replaced, "Recolor scheduled");
    }

    /// Run the pending recolor if it is due.
    pub fn poll(&mut self) -> Option<Result<RecolorReport, RecolorError>> {
        let trigger = self.debouncer.poll(self.clock.now())?;
        tracing::debug!(?trigger, "Running scheduled recolor");
        Some(self.apply_colors())
    }

    /// Time until the pending recolor is due, if one is pending.
    pub fn time_until_due(&self) -> Option<Duration> {
        self.debouncer.remaining(self.clock.now())
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Settings as they stand right now.
    pub fn snapshot(&self) -> RecolorSnapshot {
        RecolorSnapshot {
            palette_name: self.palette_name.clone(),
            palette: self.palette.clone(),
            mode: self.dither,
            transform: self.transform,
        }
    }

    /// Run a recolor pass immediately and update the status line.
    pub fn apply_colors(&mut self) -> Result<RecolorReport, RecolorError> {
        let snapshot = self.snapshot();
        let ctx = PassContext {
            document: self.document.as_mut(),
            image: self.image.as_ref(),
            layout: &mut *self.layout,
        };
        let result = self.pipeline.run(ctx, &snapshot);
        match &result {
            Ok(report) => {
                self.status = report.status_message();
                self.last_report = Some(report.clone());
            }
            Err(e) => {
                if !e.is_not_ready() {
                    tracing::error!(%e, "Recolor failed");
                }
                self.status = e.to_string();
            }
        }
        result
    }

    /// Restore the document's original fills.
    pub fn reset(&mut self) -> Result<(), RecolorError> {
        let document = self
            .document
            .as_mut()
            .ok_or(RecolorError::DocumentNotLoaded)?;
        document.reset();
        self.status = "SVG reset to original colors.".to_string();
        Ok(())
    }

    /// Current document text for download.
    pub fn export_svg(&mut self) -> Result<String, RecolorError> {
        let document = self
            .document
            .as_ref()
            .ok_or(RecolorError::DocumentNotLoaded)?;
        let text = document.to_svg_string();
        self.status = "SVG downloaded.".to_string();
        Ok(text)
    }

    /// The image as placed right now, one pixel per ViewBox unit.
    pub fn render_raster(&self) -> Result<RasterBuffer, RecolorError> {
        let document = self
            .document
            .as_ref()
            .ok_or(RecolorError::DocumentNotLoaded)?;
        let image = self.image.as_ref().ok_or(RecolorError::ImageNotLoaded)?;
        Ok(image.render(&document.view_box(), &self.transform)?)
    }

    /// PNG of the current document, with the image overlaid at `opacity`
    /// when one is loaded and `opacity` is above zero.
    pub fn preview_png(&self, opacity: f32) -> Result<Vec<u8>, RecolorError> {
        let document = self
            .document
            .as_ref()
            .ok_or(RecolorError::DocumentNotLoaded)?;
        let (width, height) = document.view_box().canvas_size();
        if width == 0 || height == 0 {
            return Err(RecolorError::CanvasEmpty);
        }
        let overlay = match &self.image {
            Some(_) if opacity > 0.0 => Some(self.render_raster()?),
            _ => None,
        };
        let png = PreviewRenderer::new().render_png(
            document.to_svg_string().as_bytes(),
            width,
            height,
            overlay.as_ref().map(|raster| (raster, opacity)),
        )?;
        Ok(png)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn document(&self) -> Option<&SvgDocument> {
        self.document.as_ref()
    }

    pub fn image(&self) -> Option<&RasterImage> {
        self.image.as_ref()
    }

    pub fn palette_name(&self) -> &str {
        &self.palette_name
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn dither(&self) -> DitherMode {
        self.dither
    }

    pub fn transform(&self) -> ImageTransform {
        self.transform
    }

    pub fn bounds(&self) -> TransformBounds {
        self.bounds
    }

    pub fn last_report(&self) -> Option<&RecolorReport> {
        self.last_report.as_ref()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl Session<MonotonicClock> {
    /// Session on the real clock.
    pub fn with_config(config: AppConfig) -> Self {
        Self::new(config, MonotonicClock::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scheduler::ManualClock;
    use pretty_assertions::assert_eq;

    const DOC: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 50">
  <path d="M0 0h50v50h-50z" fill="#e6e6e6"/>
  <path d="M50 0h50v50h-50z" fill="#e6e6e6"/>
</svg>"##;

    fn session() -> (Session<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut s = Session::new(AppConfig::default(), clock.clone());
        s.load_document(DOC).unwrap();
        (s, clock)
    }

    fn red_image() -> RasterImage {
        RasterImage::from_rgba(1, 1, &[250, 0, 0, 255]).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let s = Session::new(AppConfig::default(), ManualClock::new());
        assert_eq!(s.status(), "SVG not loaded yet.");
        assert_eq!(s.palette_name(), "purple");
        assert_eq!(s.dither(), DitherMode::None);
    }

    #[test]
    fn test_load_document_sets_bounds() {
        let (s, _) = session();
        assert_eq!(s.status(), "SVG loaded. Upload an image to begin.");
        assert_eq!(s.bounds().translate_x, 35.0);
        assert_eq!(s.bounds().translate_y, 18.0);
    }

    #[test]
    fn test_bad_document_keeps_previous() {
        let (mut s, _) = session();
        assert!(s.load_document("not svg").is_err());
        assert_eq!(s.status(), "Could not load the SVG file.");
        assert!(s.document().is_some());
    }

    #[test]
    fn test_unrenderable_document_is_rejected() {
        let (mut s, _) = session();
        // The tag scan accepts this, but the undeclared entity fails layout
        let broken = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10">
  <title>a&nbsp;b</title>
  <path d="M0 0h10v10h-10z" fill="#123456"/>
</svg>"##;
        let err = s.load_document(broken).unwrap_err();
        assert!(matches!(err, DocumentError::Layout(_)));
        assert_eq!(s.status(), "Could not load the SVG file.");
        assert_eq!(s.document().map(|d| d.len()), Some(2));

        s.install_image(red_image());
        let report = s.poll().unwrap().unwrap();
        assert_eq!(report.updated, 2);
    }

    #[test]
    fn test_image_load_recolors_immediately() {
        let (mut s, _) = session();
        s.install_image(red_image());
        assert_eq!(s.status(), "Image loaded. Applying colors...");
        assert_eq!(s.time_until_due(), Some(Duration::ZERO));
        let report = s.poll().unwrap().unwrap();
        assert_eq!(report.updated, 2);
        assert_eq!(s.status(), "Updated 2 filled hexagons (white base applied).");
        assert!(s.poll().is_none());
    }

    #[test]
    fn test_settings_without_image_do_not_schedule() {
        let (mut s, _) = session();
        s.set_palette("blue");
        s.set_dither(DitherMode::Ordered);
        s.set_transform(ImageTransform::default());
        s.zoom(100.0);
        s.pan(5.0, 5.0);
        assert!(!s.is_pending());
        assert_eq!(s.transform(), ImageTransform::default());
    }

    #[test]
    fn test_unknown_palette_falls_back() {
        let (mut s, _) = session();
        assert_eq!(s.set_palette("nope"), "purple");
    }

    #[test]
    fn test_transform_is_clamped() {
        let (mut s, _) = session();
        s.set_transform(ImageTransform {
            scale: 50.0,
            translate_x: -1000.0,
            translate_y: 3.0,
        });
        assert_eq!(
            s.transform(),
            ImageTransform {
                scale: 5.0,
                translate_x: -35.0,
                translate_y: 3.0,
            }
        );
    }

    #[test]
    fn test_apply_without_image() {
        let (mut s, _) = session();
        assert!(matches!(s.apply_colors(), Err(RecolorError::ImageNotLoaded)));
        assert_eq!(s.status(), "Load an image before applying colors.");
    }

    #[test]
    fn test_reset_and_export() {
        let (mut s, _) = session();
        s.install_image(red_image());
        s.apply_colors().unwrap();
        assert_ne!(s.export_svg().unwrap(), DOC);
        assert_eq!(s.status(), "SVG downloaded.");
        s.reset().unwrap();
        assert_eq!(s.status(), "SVG reset to original colors.");
        assert_eq!(s.export_svg().unwrap(), DOC);
    }

    #[test]
    fn test_document_palette() {
        let (mut s, _) = session();
        s.use_document_palette().unwrap();
        assert_eq!(s.palette_name(), DOCUMENT_PALETTE);
        assert_eq!(s.palette().len(), 1);
    }

    #[test]
    fn test_bad_image_keeps_prior() {
        let (mut s, _) = session();
        s.install_image(red_image());
        assert!(s.load_image_bytes(b"garbage").is_err());
        assert_eq!(s.status(), "Could not load that image.");
        assert!(s.image().is_some());
    }
}
