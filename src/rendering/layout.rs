//! Region geometry measured by laying the document out with usvg.
//!
//! The measurement copy of a document carries one id per region, so each
//! path node in the usvg tree can be traced back to its region. Boxes are
//! reported in a display space `display_width` units wide; any width works
//! because geometry mapping only uses positions relative to the document box.

use resvg::usvg;
use std::collections::HashMap;

use crate::error::RenderError;
use crate::models::{Rect, RegionId};
use crate::services::geometry::LayoutProbe;
use crate::services::svg_document::{parse_measure_id, SvgDocument};

/// Display width used when none is configured.
pub const DEFAULT_DISPLAY_WIDTH: f32 = 800.0;

/// Measured layout of one document.
#[derive(Debug, Clone, Default)]
pub struct UsvgLayout {
    document: Rect,
    regions: HashMap<RegionId, Rect>,
    frames: u32,
}

impl UsvgLayout {
    /// Lay out `document` at the given display width.
    pub fn measure(document: &SvgDocument, display_width: f32) -> Result<Self, RenderError> {
        Self::from_svg(&document.measurement_svg(), display_width)
    }

    /// Lay out measurement-copy SVG text.
    pub fn from_svg(text: &str, display_width: f32) -> Result<Self, RenderError> {
        let tree = usvg::Tree::from_str(text, &usvg::Options::default())
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let size = tree.size();
        let scale = if display_width > 0.0 && size.width() > 0.0 {
            display_width / size.width()
        } else {
            1.0
        };

        let mut regions = HashMap::new();
        collect_regions(tree.root(), scale, &mut regions);

        let document = Rect::new(0.0, 0.0, size.width() * scale, size.height() * scale);
        tracing::debug!(
            regions = regions.len(),
            width = document.width,
            height = document.height,
            "Measured document layout"
        );
        Ok(Self {
            document,
            regions,
            frames: 0,
        })
    }

    /// A layout that never becomes measurable.
    pub fn unmeasured() -> Self {
        Self::default()
    }

    /// Number of regions that produced geometry.
    pub fn measured_regions(&self) -> usize {
        self.regions.len()
    }

    /// Frames waited so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }
}

fn collect_regions(group: &usvg::Group, scale: f32, out: &mut HashMap<RegionId, Rect>) {
    for node in group.children() {
        if let usvg::Node::Group(child) = node {
            collect_regions(child, scale, out);
            continue;
        }
        let Some(id) = parse_measure_id(node.id()) else {
            continue;
        };
        let b = node.abs_bounding_box();
        out.insert(
            id,
            Rect::new(b.x(), b.y(), b.width(), b.height()).scaled(scale),
        );
    }
}

impl LayoutProbe for UsvgLayout {
    fn document_bounds(&self) -> Rect {
        self.document
    }

    fn region_bounds(&self, id: RegionId) -> Option<Rect> {
        self.regions.get(&id).copied()
    }

    fn next_frame(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ViewBox;
    use crate::services::geometry::map_region;

    const DOC: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="200" viewBox="0 0 200 100">
  <g transform="translate(20 10)">
    <path d="M0 0h20v20h-20z" fill="#123456"/>
  </g>
  <path d="M150 50h10v10h-10z" style="fill:#abcdef"/>
</svg>"##;

    #[test]
    fn test_measures_each_region() {
        let doc = SvgDocument::parse(DOC).unwrap();
        let layout = UsvgLayout::measure(&doc, 400.0).unwrap();
        assert_eq!(layout.measured_regions(), 2);
        assert_eq!(layout.document_bounds(), Rect::new(0.0, 0.0, 400.0, 200.0));
        let r0 = layout.region_bounds(RegionId(0)).unwrap();
        assert!((r0.x - 40.0).abs() < 0.01);
        assert!((r0.width - 40.0).abs() < 0.01);
    }

    #[test]
    fn test_mapping_is_independent_of_display_width() {
        let doc = SvgDocument::parse(DOC).unwrap();
        let vb = doc.view_box();
        for width in [120.0, 400.0, 1900.0] {
            let layout = UsvgLayout::measure(&doc, width).unwrap();
            let (x0, y0) = map_region(&layout, RegionId(0), &vb).unwrap().unwrap();
            let (x1, y1) = map_region(&layout, RegionId(1), &vb).unwrap().unwrap();
            assert!((x0 - 30.0).abs() < 0.01 && (y0 - 20.0).abs() < 0.01);
            assert!((x1 - 155.0).abs() < 0.01 && (y1 - 55.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_unmeasured_is_not_ready() {
        let mut layout = UsvgLayout::unmeasured();
        assert!(!layout.document_bounds().is_measurable());
        layout.next_frame();
        layout.next_frame();
        assert_eq!(layout.frames(), 2);
        assert!(map_region(&layout, RegionId(0), &ViewBox::new(10.0, 10.0)).is_err());
    }

    #[test]
    fn test_invalid_svg() {
        assert!(matches!(
            UsvgLayout::from_svg("<svg", 100.0),
            Err(RenderError::SvgParse(_))
        ));
    }
}
