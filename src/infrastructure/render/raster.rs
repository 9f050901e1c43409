//! Rasterization of the SVG document to PNG via `resvg`.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use resvg::render;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, Options as UsvgOptions};

use crate::domain::renderer::RenderError;

#[cfg(test)]
use crate::domain::entities::Color;

/// Rasterizes an SVG document produced by [`super::svg::render_svg`].
///
/// The document already carries `width`/`height` equal to the requested
/// size, so the tree is drawn at identity scale. Edges are anti-aliased.
pub fn rasterize(svg_data: &str) -> Result<RgbImage, RenderError> {
    let opts = UsvgOptions {
        shape_rendering: usvg::ShapeRendering::GeometricPrecision,
        ..Default::default()
    };

    let tree = usvg::Tree::from_data(svg_data.as_bytes(), &opts)
        .map_err(|e| RenderError::Image(format!("Failed to parse SVG: {e}")))?;

    let pixmap_size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(pixmap_size.width(), pixmap_size.height())
        .ok_or_else(|| RenderError::Image("Failed to create pixmap".to_string()))?;

    render(&tree, Transform::default(), &mut pixmap.as_mut());

    // The background rect is opaque, so alpha is dropped after demultiplying.
    let mut image = RgbImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgb([c.red(), c.green(), c.blue()]);
    }
    Ok(image)
}

/// Encodes a bitmap as PNG.
pub fn encode_png(image: DynamicImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| RenderError::Image(e.to_string()))?;
    Ok(buf)
}

/// Pixel color at the center of module `(mx, my)` (canvas coordinates).
#[cfg(test)]
pub(crate) fn module_center_pixel(image: &RgbImage, dimension: usize, mx: f64, my: f64) -> Color {
    let scale = f64::from(image.width()) / dimension as f64;
    let px = ((mx + 0.5) * scale) as u32;
    let py = ((my + 0.5) * scale) as u32;
    let Rgb([r, g, b]) = *image.get_pixel(px, py);
    Color::new(r, g, b)
}
