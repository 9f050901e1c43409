//! Logo compositing onto raster QR output.

use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use resvg::tiny_skia::{self, ColorU8, FillRule, Paint, PathBuilder, Pixmap, Transform};
use tracing::{debug, warn};

use crate::domain::renderer::RenderError;
use crate::domain::repositories::{LogoError, LogoRepository};

use super::raster::encode_png;

/// Extra backdrop radius beyond the logo's half-diagonal, in pixels.
const BACKDROP_PADDING: f32 = 2.0;

/// Overlays a logo onto finished PNG output.
///
/// [`LogoCompositor::apply`] always yields usable bytes: any failure while
/// resolving, decoding, or re-encoding is logged and the original bitmap is
/// returned untouched.
pub struct LogoCompositor<L: LogoRepository> {
    logos: Arc<L>,
}

impl<L: LogoRepository> LogoCompositor<L> {
    pub fn new(logos: Arc<L>) -> Self {
        Self { logos }
    }

    /// Composites the logo referenced by `logo_ref` onto `qr_png`.
    ///
    /// Decoding and blending run on a blocking thread.
    pub async fn apply(&self, qr_png: Vec<u8>, logo_ref: &str, logo_size_percent: u32) -> Vec<u8> {
        let logo = match self.logos.resolve(logo_ref).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Skipping logo {}: {}", logo_ref, e);
                return qr_png;
            }
        };

        let original = Arc::new(qr_png);
        let input = original.clone();
        let result = tokio::task::spawn_blocking(move || {
            composite(&input, &logo, logo_size_percent)
        })
        .await;

        match result {
            Ok(Ok(composited)) => {
                debug!("Composited logo {} at {}%", logo_ref, logo_size_percent);
                composited
            }
            Ok(Err(e)) => {
                warn!("Logo compositing failed for {}: {}", logo_ref, e);
                Arc::unwrap_or_clone(original)
            }
            Err(e) => {
                warn!("Logo compositing task failed for {}: {}", logo_ref, e);
                Arc::unwrap_or_clone(original)
            }
        }
    }
}

/// Places `logo` at the center of `qr_png` on a white disc.
///
/// The logo is scaled, preserving aspect ratio, so its long edge equals
/// `round(width * logo_size_percent / 100)`. Output dimensions always match
/// the input.
///
/// # Errors
///
/// Returns [`LogoError::Decode`] if either image cannot be decoded and
/// [`LogoError::Encode`] if the result cannot be written as PNG.
pub fn composite(qr_png: &[u8], logo: &[u8], logo_size_percent: u32) -> Result<Vec<u8>, LogoError> {
    let qr = image::load_from_memory(qr_png).map_err(|e| LogoError::Decode(e.to_string()))?;
    let logo = image::load_from_memory(logo).map_err(|e| LogoError::Decode(e.to_string()))?;

    let had_alpha = qr.color().has_alpha();
    let mut canvas = qr.to_rgba8();
    let (width, height) = canvas.dimensions();

    let box_size = ((f64::from(width) * f64::from(logo_size_percent)) / 100.0).round() as u32;
    let box_size = box_size.max(1);
    let scaled = logo.resize(box_size, box_size, FilterType::Lanczos3).to_rgba8();
    let (lw, lh) = scaled.dimensions();

    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let radius = (lw as f32).hypot(lh as f32) / 2.0 + BACKDROP_PADDING;
    fill_backdrop(&mut canvas, cx, cy, radius)?;

    let x = i64::from(width / 2) - i64::from(lw / 2);
    let y = i64::from(height / 2) - i64::from(lh / 2);
    imageops::overlay(&mut canvas, &scaled, x, y);

    let output = if had_alpha {
        DynamicImage::ImageRgba8(canvas)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
    };

    encode_png(output).map_err(|e: RenderError| LogoError::Encode(e.to_string()))
}

/// Paints an anti-aliased white disc onto `canvas`.
fn fill_backdrop(canvas: &mut RgbaImage, cx: f32, cy: f32, radius: f32) -> Result<(), LogoError> {
    let (width, height) = canvas.dimensions();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| LogoError::Encode("Failed to create pixmap".to_string()))?;

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(canvas.pixels()) {
        let Rgba([r, g, b, a]) = *src;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }

    let disc = PathBuilder::from_circle(cx, cy, radius)
        .ok_or_else(|| LogoError::Encode(format!("Invalid backdrop radius {radius}")))?;
    let mut paint = Paint::default();
    paint.set_color(tiny_skia::Color::WHITE);
    paint.anti_alias = true;
    pixmap.fill_path(&disc, &paint, FillRule::Winding, Transform::identity(), None);

    for (dst, src) in canvas.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(())
}
