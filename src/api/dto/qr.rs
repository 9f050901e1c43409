//! DTOs for QR endpoints.

use serde::Serialize;

/// Response of `GET /qr/data-url`.
#[derive(Debug, Serialize)]
pub struct DataUrlResponse {
    pub url: String,
    pub format: &'static str,
    pub data_url: String,
}
