//! A scripted layout probe.

use hexmosaic::models::{Rect, RegionId};
use hexmosaic::services::LayoutProbe;
use std::collections::HashMap;

/// Layout with fixed boxes that becomes measurable after `settle_after`
/// frames.
#[derive(Debug, Clone, Default)]
pub struct FakeLayout {
    pub document: Rect,
    pub regions: HashMap<RegionId, Rect>,
    pub settle_after: u32,
    pub frames: u32,
}

impl FakeLayout {
    pub fn new(document: Rect) -> Self {
        Self {
            document,
            ..Default::default()
        }
    }

    pub fn region(mut self, id: usize, rect: Rect) -> Self {
        self.regions.insert(RegionId(id), rect);
        self
    }

    pub fn settle_after(mut self, frames: u32) -> Self {
        self.settle_after = frames;
        self
    }

    /// The strip fixture laid out at `scale` display pixels per unit.
    pub fn strip(scale: f32) -> Self {
        let cell = |i: usize| Rect::new(i as f32 * 10.0, 0.0, 10.0, 10.0).scaled(scale);
        Self::new(Rect::new(0.0, 0.0, 30.0, 10.0).scaled(scale))
            .region(0, cell(0))
            .region(1, cell(1))
            .region(2, cell(2))
            .region(3, Rect::new(0.0, 0.0, 30.0, 10.0).scaled(scale))
    }
}

impl LayoutProbe for FakeLayout {
    fn document_bounds(&self) -> Rect {
        if self.frames >= self.settle_after {
            self.document
        } else {
            Rect::default()
        }
    }

    fn region_bounds(&self, id: RegionId) -> Option<Rect> {
        self.regions.get(&id).copied()
    }

    fn next_frame(&mut self) {
        self.frames += 1;
    }
}
