//! HTTP server initialization and runtime setup.
//!
//! Handles cache backend selection, service wiring, and Axum server lifecycle.

use crate::application::services::QrService;
use crate::config::{CacheBackend, Config};
use crate::infrastructure::assets::FsLogoRepository;
use crate::infrastructure::cache::{CacheService, FileCache, NullCache, RedisCache};
use crate::infrastructure::render::StyledQrRenderer;
use crate::routes::app_router;
use crate::state::{AppState, DefaultQrService};

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Opens the configured cache backend.
///
/// An unreachable backend is not fatal: the service falls back to
/// [`NullCache`] and renders on every request.
pub async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    match config.cache_backend {
        CacheBackend::File => match FileCache::open(&config.cache_dir, config.cache_ttl_seconds).await {
            Ok(cache) => {
                tracing::info!("Cache enabled (file)");
                Arc::new(cache)
            }
            Err(e) => {
                tracing::warn!("Failed to open file cache: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        },
        CacheBackend::Redis => {
            let Some(redis_url) = config.redis_url.as_deref() else {
                tracing::warn!("Redis backend selected without a URL. Using NullCache.");
                return Arc::new(NullCache::new());
            };
            match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
                Ok(redis) => {
                    tracing::info!("Cache enabled (Redis)");
                    Arc::new(redis)
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                    Arc::new(NullCache::new())
                }
            }
        }
        CacheBackend::None => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    }
}

/// Wires the QR service from configuration.
pub async fn build_qr_service(config: &Config) -> DefaultQrService {
    let cache = build_cache(config).await;

    QrService::new(
        Arc::new(StyledQrRenderer::new(config.error_correction)),
        Arc::new(FsLogoRepository::new(&config.logo_asset_dir)),
        cache,
        config.style_defaults.clone(),
        config.cache_ttl_seconds,
    )
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Cache backend (or NullCache fallback)
/// - QR rendering service
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Listen address is invalid
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let qr_service = Arc::new(build_qr_service(&config).await);
    let state = AppState::new(qr_service);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
