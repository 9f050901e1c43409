//! API route configuration.

use crate::api::handlers::{health_handler, qr_data_url_handler, qr_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All public routes.
///
/// # Endpoints
///
/// - `GET /qr?url=...`           - QR image bytes
/// - `GET /qr/data-url?url=...`  - QR image as a `data:` URL
/// - `GET /health`               - Cache backend health
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/qr", get(qr_handler))
        .route("/qr/data-url", get(qr_data_url_handler))
        .route("/health", get(health_handler))
}
