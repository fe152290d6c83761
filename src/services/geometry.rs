//! Geometry mapping from on-screen layout to raster coordinates.
//!
//! Regions are authored in ViewBox units but measured where they are laid
//! out. The mapper expresses a region's centre as a fraction of the
//! document's rendered box and scales that fraction back into ViewBox units,
//! which are also raster pixels (the sampling canvas is one pixel per unit).

use thiserror::Error;

use crate::models::{Rect, RegionId, ViewBox};

/// Measures rendered geometry.
///
/// All boxes share one display coordinate system. Implemented by a real
/// renderer in production and by fixtures in tests.
pub trait LayoutProbe {
    /// Rendered box of the whole document.
    fn document_bounds(&self) -> Rect;

    /// Rendered box of one region, `None` if it produced no geometry.
    fn region_bounds(&self, id: RegionId) -> Option<Rect>;

    /// Give layout one more frame to settle.
    fn next_frame(&mut self);
}

/// The document box has no area yet; retry after the next layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("layout not measurable yet")]
pub struct LayoutNotReady;

/// Map a region's rendered box to a point in raster space.
pub fn centroid_in_raster(
    region: Rect,
    document: Rect,
    view_box: &ViewBox,
) -> Result<(f32, f32), LayoutNotReady> {
    if !document.is_measurable() {
        return Err(LayoutNotReady);
    }
    let (cx, cy) = region.center();
    let rel_x = (cx - document.x) / document.width;
    let rel_y = (cy - document.y) / document.height;
    Ok((rel_x * view_box.width, rel_y * view_box.height))
}

/// Convenience over a probe. `Ok(None)` when the region has no geometry.
pub fn map_region(
    probe: &dyn LayoutProbe,
    id: RegionId,
    view_box: &ViewBox,
) -> Result<Option<(f32, f32)>, LayoutNotReady> {
    let document = probe.document_bounds();
    if !document.is_measurable() {
        return Err(LayoutNotReady);
    }
    let Some(region) = probe.region_bounds(id) else {
        return Ok(None);
    };
    let (x, y) = centroid_in_raster(region, document, view_box)?;
    Ok((x.is_finite() && y.is_finite()).then_some((x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_at_document_origin() {
        let vb = ViewBox::new(600.0, 400.0);
        let doc = Rect::new(100.0, 50.0, 300.0, 200.0);
        // Region centred in the document.
        let region = Rect::new(240.0, 140.0, 20.0, 20.0);
        assert_eq!(centroid_in_raster(region, doc, &vb), Ok((300.0, 200.0)));
    }

    #[test]
    fn test_centroid_is_scale_invariant() {
        let vb = ViewBox::new(600.0, 400.0);
        let doc = Rect::new(10.0, 10.0, 300.0, 200.0);
        let region = Rect::new(50.0, 70.0, 12.0, 8.0);

        let a = centroid_in_raster(region, doc, &vb).unwrap();
        let b = centroid_in_raster(region.scaled(2.0), doc.scaled(2.0), &vb).unwrap();
        assert!((a.0 - b.0).abs() < 1e-3);
        assert!((a.1 - b.1).abs() < 1e-3);
    }

    #[test]
    fn test_zero_document_is_not_ready() {
        let vb = ViewBox::new(600.0, 400.0);
        let region = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            centroid_in_raster(region, Rect::new(0.0, 0.0, 0.0, 200.0), &vb),
            Err(LayoutNotReady)
        );
        assert_eq!(
            centroid_in_raster(region, Rect::new(0.0, 0.0, 300.0, 0.0), &vb),
            Err(LayoutNotReady)
        );
    }

    struct Fixed;

    impl LayoutProbe for Fixed {
        fn document_bounds(&self) -> Rect {
            Rect::new(0.0, 0.0, 100.0, 100.0)
        }

        fn region_bounds(&self, id: RegionId) -> Option<Rect> {
            (id.0 == 0).then(|| Rect::new(40.0, 40.0, 20.0, 20.0))
        }

        fn next_frame(&mut self) {}
    }

    #[test]
    fn test_map_region() {
        let vb = ViewBox::new(10.0, 10.0);
        assert_eq!(map_region(&Fixed, RegionId(0), &vb), Ok(Some((5.0, 5.0))));
        assert_eq!(map_region(&Fixed, RegionId(1), &vb), Ok(None));
    }
}
