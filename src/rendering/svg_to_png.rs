use mosaic_dither::RasterBuffer;
use resvg::usvg::{self, Transform};
use std::io::Cursor;
use tiny_skia::{Pixmap, PixmapPaint};

use crate::error::RenderError;
use crate::rendering::raster::pixmap_from_rgba;

/// Renders a recolored mosaic to PNG, optionally with the sampled image
/// overlaid on top.
///
/// The output canvas is one pixel per ViewBox unit, the same grid the
/// sampling raster uses, so an overlay lines up with the regions exactly.
pub struct PreviewRenderer {
    options: usvg::Options<'static>,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self {
            options: usvg::Options::default(),
        }
    }

    /// Render SVG text to an RGBA PNG of `width` x `height`.
    ///
    /// `overlay` is drawn over the document at `opacity` (0.0..=1.0) and must
    /// have the canvas size.
    pub fn render_png(
        &self,
        svg_data: &[u8],
        width: u32,
        height: u32,
        overlay: Option<(&RasterBuffer, f32)>,
    ) -> Result<Vec<u8>, RenderError> {
        let mut pixmap = self.rasterize_svg(svg_data, width, height)?;

        if let Some((raster, opacity)) = overlay {
            let layer = pixmap_from_rgba(
                raster.width() as u32,
                raster.height() as u32,
                raster.data(),
            )?;
            let paint = PixmapPaint {
                opacity: opacity.clamp(0.0, 1.0),
                ..Default::default()
            };
            pixmap.draw_pixmap(0, 0, layer.as_ref(), &paint, Transform::identity(), None);
        }

        let png_bytes = encode_png(&pixmap)?;

        // Re-compress with oxipng (zopfli + adaptive filter selection)
        let optimized = oxipng::optimize_from_memory(
            &png_bytes,
            &oxipng::Options {
                strip: oxipng::StripChunks::Safe,
                optimize_alpha: false,
                ..Default::default()
            },
        )
        .unwrap_or(png_bytes);
        tracing::debug!(width, height, bytes = optimized.len(), "Rendered preview");
        Ok(optimized)
    }

    /// Parse and rasterize SVG to a white-backed pixmap, fitted and centred.
    fn rasterize_svg(&self, svg_data: &[u8], width: u32, height: u32) -> Result<Pixmap, RenderError> {
        let tree = usvg::Tree::from_data(svg_data, &self.options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let svg_size = tree.size();
        let scale_x = width as f32 / svg_size.width();
        let scale_y = height as f32 / svg_size.height();
        let scale = scale_x.min(scale_y);

        let scaled_width = svg_size.width() * scale;
        let scaled_height = svg_size.height() * scale;
        let offset_x = (width as f32 - scaled_width) / 2.0;
        let offset_y = (height as f32 - scaled_height) / 2.0;

        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let transform = Transform::from_scale(scale, scale).post_translate(offset_x, offset_y);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a pixmap as straight-alpha RGBA PNG.
fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
