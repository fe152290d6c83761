//! The overlaid raster image and its render-to-buffer step.
//!
//! Decoded images are kept as premultiplied tiny-skia pixmaps. Rendering
//! draws the image into a transparent canvas the size of the ViewBox with a
//! cover fit, the user transform, and nearest-neighbour sampling, then reads
//! the canvas back as straight-alpha RGBA.

use image::ImageReader;
use mosaic_dither::{RasterBuffer, Rgba};
use std::io::Cursor;
use tiny_skia::{ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::error::RenderError;
use crate::models::{ImageTransform, ViewBox};

/// A decoded bitmap ready to be placed over the document.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pixmap: Pixmap,
}

impl RasterImage {
    /// Decode PNG, JPEG, BMP, GIF or WebP bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, RenderError> {
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| RenderError::Decode(format!("Failed to detect format: {e}")))?
            .decode()
            .map_err(|e| RenderError::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        tracing::debug!(width, height, "Decoded image");
        Self::from_rgba(width, height, image.as_raw())
    }

    /// Wrap straight-alpha RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, data: &[u8]) -> Result<Self, RenderError> {
        Ok(Self {
            pixmap: pixmap_from_rgba(width, height, data)?,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Scale that makes the image cover the whole ViewBox.
    pub fn cover_scale(&self, view_box: &ViewBox) -> f32 {
        (view_box.width / self.width() as f32).max(view_box.height / self.height() as f32)
    }

    /// Render into a ViewBox-sized sampling buffer at the given placement.
    pub fn render(
        &self,
        view_box: &ViewBox,
        transform: &ImageTransform,
    ) -> Result<RasterBuffer, RenderError> {
        let (width, height) = view_box.canvas_size();
        let mut canvas = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;

        let scale = self.cover_scale(view_box) * transform.scale;
        let center_x = view_box.width / 2.0 + transform.translate_x;
        let center_y = view_box.height / 2.0 + transform.translate_y;
        let placement = Transform::from_row(
            scale,
            0.0,
            0.0,
            scale,
            center_x - scale * self.width() as f32 / 2.0,
            center_y - scale * self.height() as f32 / 2.0,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Nearest,
            ..Default::default()
        };
        canvas.draw_pixmap(0, 0, self.pixmap.as_ref(), &paint, placement, None);

        Ok(buffer_from_pixmap(&canvas))
    }
}

/// Build a premultiplied pixmap from straight-alpha RGBA8.
pub(crate) fn pixmap_from_rgba(width: u32, height: u32, data: &[u8]) -> Result<Pixmap, RenderError> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(RenderError::Decode(format!(
            "pixel buffer has {} bytes, expected {expected}",
            data.len()
        )));
    }
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(data.chunks_exact(4)) {
        *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Ok(pixmap)
}

/// Read a pixmap back as straight-alpha RGBA.
pub(crate) fn buffer_from_pixmap(pixmap: &Pixmap) -> RasterBuffer {
    let width = pixmap.width() as usize;
    let pixels = pixmap.pixels();
    RasterBuffer::from_fn(width, pixmap.height() as usize, |x, y| {
        let c = pixels[y * width + x].demultiply();
        Rgba::new(c.red(), c.green(), c.blue(), c.alpha())
    })
}
