use serde::Serialize;

use super::view_box::{Rect, ViewBox};

/// Zoom change per wheel delta unit.
pub const WHEEL_ZOOM_RATE: f32 = 0.001;

/// User placement of the raster image over the ViewBox.
///
/// `scale` multiplies the cover fit; translation is in ViewBox units from
/// the centered position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImageTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

/// Allowed ranges for an [`ImageTransform`].
///
/// Translation is symmetric: `[-translate_x, translate_x]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformBounds {
    pub scale_min: f32,
    pub scale_max: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for TransformBounds {
    fn default() -> Self {
        Self {
            scale_min: 0.1,
            scale_max: 5.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl TransformBounds {
    /// Bounds for a document: translation limited to `round(size * fraction)`.
    pub fn for_view_box(view_box: &ViewBox, fraction: f32, scale_min: f32, scale_max: f32) -> Self {
        let range = |size: f32| {
            let r = (size * fraction).round();
            if r.is_finite() {
                r.abs()
            } else {
                0.0
            }
        };
        let (lo, hi) = if scale_min <= scale_max {
            (scale_min, scale_max)
        } else {
            (scale_max, scale_min)
        };
        Self {
            scale_min: lo.max(f32::MIN_POSITIVE),
            scale_max: hi.max(f32::MIN_POSITIVE),
            translate_x: range(view_box.width),
            translate_y: range(view_box.height),
        }
    }

    /// Clamp every component into range. NaN components fall back to the
    /// default placement before clamping.
    pub fn clamp(&self, t: ImageTransform) -> ImageTransform {
        let or = |v: f32, fallback: f32| if v.is_nan() { fallback } else { v };
        ImageTransform {
            scale: or(t.scale, 1.0).clamp(self.scale_min, self.scale_max),
            translate_x: or(t.translate_x, 0.0).clamp(-self.translate_x, self.translate_x),
            translate_y: or(t.translate_y, 0.0).clamp(-self.translate_y, self.translate_y),
        }
    }

    /// Apply a mouse wheel step: `scale * (1 - delta_y * 0.001)`.
    pub fn zoom_by_wheel(&self, t: ImageTransform, delta_y: f32) -> ImageTransform {
        let factor = 1.0 - delta_y * WHEEL_ZOOM_RATE;
        self.clamp(ImageTransform {
            scale: t.scale * factor,
            ..t
        })
    }

    /// Apply a drag of `(dx, dy)` display pixels.
    ///
    /// The delta is converted to ViewBox units through the document's rendered
    /// box. Returns `None` while that box is not measurable.
    pub fn pan_by_display(
        &self,
        t: ImageTransform,
        dx: f32,
        dy: f32,
        document: Rect,
        view_box: &ViewBox,
    ) -> Option<ImageTransform> {
        if !document.is_measurable() {
            return None;
        }
        let dx_view = dx / document.width * view_box.width;
        let dy_view = dy / document.height * view_box.height;
        Some(self.clamp(ImageTransform {
            scale: t.scale,
            translate_x: t.translate_x + dx_view,
            translate_y: t.translate_y + dy_view,
        }))
    }
}
