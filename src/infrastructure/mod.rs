//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! the concrete encoder, raster backend, cache backends and asset lookup.
//!
//! # Modules
//!
//! - [`assets`] - Filesystem logo resolution
//! - [`cache`] - Caching abstractions (file, Redis and no-op implementations)
//! - [`render`] - QR rendering with `qrcode` and `image`

pub mod assets;
pub mod cache;
pub mod render;
