//! QR generation service: resolve, look up, render, composite, store.

use std::sync::Arc;

use base64::Engine as _;
use tracing::{debug, warn};

use crate::domain::cache_key::{self, CacheNamespace};
use crate::domain::entities::{RenderRequest, StyleDefaults};
use crate::domain::renderer::{QrRenderer, RenderError};
use crate::domain::repositories::LogoRepository;
use crate::domain::style_resolver::{RawRenderOptions, resolve};
use crate::infrastructure::cache::{CacheResult, CacheService};
use crate::infrastructure::render::LogoCompositor;

/// Service producing cached QR images for short links.
///
/// Concurrent misses for the same key are not coalesced: each renders and
/// writes independently. Rendering is deterministic, so every writer stores
/// identical bytes and the duplicated work is the only cost.
pub struct QrService<R: QrRenderer, L: LogoRepository> {
    renderer: Arc<R>,
    compositor: LogoCompositor<L>,
    cache: Arc<dyn CacheService>,
    defaults: StyleDefaults,
    cache_ttl: u64,
}

impl<R: QrRenderer, L: LogoRepository> QrService<R, L> {
    /// Creates a new QR service.
    ///
    /// # Arguments
    ///
    /// - `renderer` - Produces PNG/SVG bytes on cache misses
    /// - `logos` - Resolves logo references for PNG compositing
    /// - `cache` - Backend for rendered payloads
    /// - `defaults` - Global style defaults
    /// - `cache_ttl` - TTL in seconds for stored payloads
    pub fn new(
        renderer: Arc<R>,
        logos: Arc<L>,
        cache: Arc<dyn CacheService>,
        defaults: StyleDefaults,
        cache_ttl: u64,
    ) -> Self {
        Self {
            renderer,
            compositor: LogoCompositor::new(logos),
            cache,
            defaults,
            cache_ttl,
        }
    }

    /// Resolves raw options against the configured defaults.
    pub fn resolve(&self, url: &str, options: &RawRenderOptions) -> RenderRequest {
        resolve(url, options, &self.defaults)
    }

    /// Returns the PNG or SVG bytes for `url` styled by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the symbol cannot be rendered. Cache and logo
    /// failures never surface here.
    pub async fn generate(&self, url: &str, options: &RawRenderOptions) -> Result<Vec<u8>, RenderError> {
        let req = self.resolve(url, options);
        self.generate_request(&req).await
    }

    /// Same as [`Self::generate`] for an already resolved request.
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    pub async fn generate_request(&self, req: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        let key = cache_key::build(CacheNamespace::Qr, req);

        match self.cache.get(&key).await {
            Ok(Some(payload)) => return Ok(payload),
            Ok(None) => {}
            Err(e) => warn!("Cache lookup failed for {}: {}", key, e),
        }

        let payload = self.render(req).await?;

        if let Err(e) = self.cache.set(&key, &payload, Some(self.cache_ttl)).await {
            warn!("Failed to cache {}: {}", key, e);
        }

        Ok(payload)
    }

    /// Returns the image as a base64 `data:` URL.
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    pub async fn generate_data_url(&self, url: &str, options: &RawRenderOptions) -> Result<String, RenderError> {
        let req = self.resolve(url, options);
        self.generate_data_url_request(&req).await
    }

    /// Same as [`Self::generate_data_url`] for an already resolved request.
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    pub async fn generate_data_url_request(&self, req: &RenderRequest) -> Result<String, RenderError> {
        let payload = self.generate_request(req).await?;

        Ok(format!(
            "data:{};base64,{}",
            req.format.content_type(),
            base64::engine::general_purpose::STANDARD.encode(payload)
        ))
    }

    /// Evicts every cached entry in `namespace`, returning the count removed.
    ///
    /// # Errors
    ///
    /// Returns a cache error if the backend cannot enumerate or delete entries.
    pub async fn clear_cache(&self, namespace: CacheNamespace) -> CacheResult<u64> {
        self.cache.clear_namespace(namespace).await
    }

    /// The cache backend in use.
    pub fn cache(&self) -> &Arc<dyn CacheService> {
        &self.cache
    }

    pub fn cache_ttl(&self) -> u64 {
        self.cache_ttl
    }

    /// Renders on a blocking thread, then composites the logo for PNG output.
    async fn render(&self, req: &RenderRequest) -> Result<Vec<u8>, RenderError> {
        let renderer = self.renderer.clone();
        let owned = req.clone();

        let payload = tokio::task::spawn_blocking(move || renderer.render(&owned))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))??;

        debug!(
            "Rendered {} ({}px, {} bytes)",
            req.format.as_str(),
            req.size,
            payload.len()
        );

        match req.logo_for_raster() {
            Some(logo_ref) => Ok(self
                .compositor
                .apply(payload, logo_ref, req.logo_size_percent)
                .await),
            None => Ok(payload),
        }
    }
}
