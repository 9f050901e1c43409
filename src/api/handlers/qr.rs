//! Handlers for QR image endpoints.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde_json::json;

use crate::api::dto::qr::DataUrlResponse;
use crate::domain::entities::RenderRequest;
use crate::domain::style_resolver::RawRenderOptions;
use crate::error::AppError;
use crate::state::AppState;

/// Renders a QR code for the `url` query parameter.
///
/// # Endpoint
///
/// `GET /qr?url=<target>&size=&color=&bg=&eyeColor=&format=&margin=&moduleStyle=&eyeStyle=&logo=&logoSize=`
///
/// Every option except `url` is optional; missing or unparseable values fall
/// back to the configured defaults rather than failing the request.
///
/// # Response
///
/// Image bytes with `Content-Type: image/png` or `image/svg+xml` and
/// `Cache-Control: public, max-age=<cache TTL>`.
///
/// # Errors
///
/// Returns 400 Bad Request if `url` is missing or too long to encode.
/// Returns 500 Internal Server Error if rendering fails.
pub async fn qr_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let req = resolve_request(&state, &params)?;
    let payload = state.qr_service.generate_request(&req).await?;

    Ok((
        [
            (header::CONTENT_TYPE, req.format.content_type().to_string()),
            (header::CACHE_CONTROL, cache_control(&state)),
        ],
        payload,
    ))
}

/// Renders a QR code and returns it as a base64 `data:` URL.
///
/// # Endpoint
///
/// `GET /qr/data-url?url=<target>&...`
///
/// Accepts the same options as [`qr_handler`].
///
/// # Response
///
/// ```json
/// {
///   "url": "https://s.example.com/abc",
///   "format": "png",
///   "data_url": "data:image/png;base64,iVBORw0KGgo..."
/// }
/// ```
///
/// # Errors
///
/// Same as [`qr_handler`].
pub async fn qr_data_url_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let req = resolve_request(&state, &params)?;
    let data_url = state.qr_service.generate_data_url_request(&req).await?;

    Ok((
        [(header::CACHE_CONTROL, cache_control(&state))],
        Json(DataUrlResponse {
            url: req.url,
            format: req.format.as_str(),
            data_url,
        }),
    ))
}

fn required_url(params: &HashMap<String, String>) -> Result<&str, AppError> {
    params
        .get("url")
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            AppError::bad_request(
                "Missing required query parameter",
                json!({ "parameter": "url" }),
            )
        })
}

fn resolve_request(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<RenderRequest, AppError> {
    let url = required_url(params)?;
    Ok(state
        .qr_service
        .resolve(url, &RawRenderOptions::from_query(params)))
}

fn cache_control(state: &AppState) -> String {
    format!("public, max-age={}", state.qr_service.cache_ttl())
}
