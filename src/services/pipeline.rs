//! The region recolor pass.
//!
//! One pass walks `Idle -> AwaitingLayout -> Sampling -> Done`. Every pass is
//! a full recompute over all paint-filled regions using the settings captured
//! in a [`RecolorSnapshot`] when the pass starts.

use mosaic_dither::{DitherMode, Palette, Sampler};
use serde::Serialize;

use crate::error::RecolorError;
use crate::models::ImageTransform;
use crate::rendering::RasterImage;
use crate::services::geometry::{map_region, LayoutProbe};
use crate::services::svg_document::{SvgDocument, BASE_FILL};

/// Where the most recent pass got to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassState {
    #[default]
    Idle,
    AwaitingLayout {
        frames: u32,
    },
    Sampling,
    Done,
}

/// Settings a pass reads, frozen at the start of the pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RecolorSnapshot {
    pub palette_name: String,
    pub palette: Palette,
    pub mode: DitherMode,
    pub transform: ImageTransform,
}

/// Outcome of a completed pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecolorReport {
    /// Regions that received a sampled color.
    pub updated: usize,
    /// Paint regions left at the base color because they had no geometry.
    pub skipped: usize,
    pub palette: String,
    pub mode: String,
    /// Frames spent waiting for layout.
    pub layout_frames: u32,
}

impl RecolorReport {
    pub fn status_message(&self) -> String {
        format!(
            "Updated {} filled hexagons (white base applied).",
            self.updated
        )
    }
}

/// Collaborators of one pass. Missing document or image abort the pass.
pub struct PassContext<'a> {
    pub document: Option<&'a mut SvgDocument>,
    pub image: Option<&'a RasterImage>,
    pub layout: &'a mut dyn LayoutProbe,
}

/// Runs recolor passes.
#[derive(Debug, Clone)]
pub struct RecolorPipeline {
    layout_retry_limit: u32,
    state: PassState,
}

impl RecolorPipeline {
    /// `layout_retry_limit` is the number of frames to wait for a measurable
    /// layout before giving up with [`RecolorError::LayoutPending`].
    pub fn new(layout_retry_limit: u32) -> Self {
        Self {
            layout_retry_limit,
            state: PassState::Idle,
        }
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// Run one full pass. Not-ready errors leave the document untouched.
    pub fn run(
        &mut self,
        ctx: PassContext<'_>,
        snapshot: &RecolorSnapshot,
    ) -> Result<RecolorReport, RecolorError> {
        self.state = PassState::Idle;
        let PassContext {
            document,
            image,
            layout,
        } = ctx;

        let document = document.ok_or(RecolorError::DocumentNotLoaded)?;
        let image = image.ok_or(RecolorError::ImageNotLoaded)?;
        let view_box = document.view_box();
        let (width, height) = view_box.canvas_size();
        if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
            return Err(RecolorError::CanvasEmpty);
        }

        let frames = self.await_layout(layout)?;

        self.state = PassState::Sampling;
        tracing::debug!(
            palette = %snapshot.palette_name,
            mode = %snapshot.mode,
            scale = snapshot.transform.scale,
            "Sampling regions"
        );
        let raster = image.render(&view_box, &snapshot.transform)?;
        let sampler = Sampler::new(snapshot.palette.clone())
            .mode(snapshot.mode)
            .prepare(raster);

        let targets = document.recolorable();
        for &id in &targets {
            document.set_fill(id, BASE_FILL);
        }

        let mut updated = 0;
        let mut skipped = 0;
        for &id in &targets {
            match map_region(&*layout, id, &view_box) {
                Ok(Some((x, y))) => {
                    let entry = sampler.sample(x, y);
                    document.set_fill(id, entry.hex());
                    updated += 1;
                }
                Ok(None) | Err(_) => {
                    tracing::debug!(region = %id, "No geometry, left at base color");
                    skipped += 1;
                }
            }
        }

        self.state = PassState::Done;
        let report = RecolorReport {
            updated,
            skipped,
            palette: snapshot.palette_name.clone(),
            mode: snapshot.mode.as_str().to_string(),
            layout_frames: frames,
        };
        tracing::info!(
            updated,
            skipped,
            palette = %report.palette,
            mode = %report.mode,
            "Recolor pass complete"
        );
        Ok(report)
    }

    /// Wait frame by frame until the document box has area.
    fn await_layout(&mut self, layout: &mut dyn LayoutProbe) -> Result<u32, RecolorError> {
        let mut frames = 0;
        while !layout.document_bounds().is_measurable() {
            if frames >= self.layout_retry_limit {
                tracing::warn!(frames, "Layout did not settle");
                self.state = PassState::Idle;
                return Err(RecolorError::LayoutPending { frames });
            }
            self.state = PassState::AwaitingLayout { frames };
            tracing::debug!(frames, "Layout not measurable, waiting a frame");
            layout.next_frame();
            frames += 1;
        }
        Ok(frames)
    }
}
