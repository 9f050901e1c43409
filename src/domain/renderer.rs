//! Renderer contract: a pure transform from [`RenderRequest`] to image bytes.

use crate::domain::entities::RenderRequest;

/// Errors raised while producing a QR image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The QR encoder rejected the payload (e.g. data too long for any version).
    #[error("QR encoding failed: {0}")]
    Encode(String),

    #[error("Raster backend failed: {0}")]
    Image(String),

    /// The blocking render task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    Task(String),
}

/// Produces PNG or SVG bytes for a resolved request.
///
/// Implementations hold no caching logic and must be deterministic: the same
/// request always yields byte-identical output. Rendering is CPU-bound and
/// synchronous; async callers run it on a blocking thread.
///
/// # Implementations
///
/// - [`crate::infrastructure::render::StyledQrRenderer`] - `qrcode` + `image` backed
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
pub trait QrRenderer: Send + Sync + 'static {
    /// Renders the symbol for `req.url` in `req.format`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Encode`] if the URL cannot be encoded and
    /// [`RenderError::Image`] if the raster backend fails.
    fn render(&self, req: &RenderRequest) -> Result<Vec<u8>, RenderError>;
}
