//! Repository trait for logo asset lookup.

use async_trait::async_trait;

/// Errors that can occur while resolving or using a logo.
#[derive(Debug, thiserror::Error)]
pub enum LogoError {
    #[error("Logo not found: {0}")]
    NotFound(String),

    #[error("Invalid logo reference: {0:?}")]
    InvalidReference(String),

    #[error("Logo I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode composited image: {0}")]
    Encode(String),
}

/// Resolves an opaque logo reference to raw image bytes.
///
/// The reference is whatever the link record stores (an asset id); its
/// meaning belongs to the asset store.
///
/// # Implementations
///
/// - [`crate::infrastructure::assets::FsLogoRepository`] - files under a local asset directory
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogoRepository: Send + Sync + 'static {
    /// Returns the raw (still encoded) image bytes for `logo_ref`.
    ///
    /// # Errors
    ///
    /// Returns [`LogoError::NotFound`] if no asset matches, or
    /// [`LogoError::InvalidReference`] / [`LogoError::Io`] on lookup failure.
    async fn resolve(&self, logo_ref: &str) -> Result<Vec<u8>, LogoError>;
}
