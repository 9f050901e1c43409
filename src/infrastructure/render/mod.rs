//! QR rendering backed by the `qrcode` encoder, with PNG output rasterized
//! from the SVG document by `resvg`.
//!
//! - [`matrix`] - Symbol encoding and finder-pattern location
//! - [`shapes`] - Module and eye geometry
//! - [`svg`] - Vector output
//! - [`raster`] - SVG to PNG rasterization
//! - [`logo`] - Logo compositing for PNG output

pub mod logo;
pub mod matrix;
pub mod raster;
pub mod shapes;
pub mod svg;

pub use logo::LogoCompositor;
pub use matrix::{ErrorCorrection, QrMatrix};

use image::DynamicImage;

use crate::domain::entities::{OutputFormat, RenderRequest};
use crate::domain::renderer::{QrRenderer, RenderError};

use shapes::Scene;

/// Default [`QrRenderer`] drawing styled modules and eyes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyledQrRenderer {
    error_correction: ErrorCorrection,
}

impl StyledQrRenderer {
    pub fn new(error_correction: ErrorCorrection) -> Self {
        Self { error_correction }
    }
}

impl QrRenderer for StyledQrRenderer {
    fn render(&self, req: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        let matrix = QrMatrix::encode(&req.url, self.error_correction)?;
        let scene = Scene::build(&matrix, req.margin as usize, req.module_style, req.eye_style);

        let document = svg::render_svg(&scene, req);

        match req.format {
            OutputFormat::Svg => Ok(document.into_bytes()),
            OutputFormat::Png => {
                let bitmap = raster::rasterize(&document)?;
                raster::encode_png(DynamicImage::ImageRgb8(bitmap))
            }
        }
    }
}
