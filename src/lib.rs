//! # QR Render
//!
//! A stylable QR-code rendering and caching service for short redirect links,
//! built with Axum.
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Render data model, option resolution, cache keys, collaborator traits
//! - **Application Layer** ([`application`]) - Cached generation flow
//! - **Infrastructure Layer** ([`infrastructure`]) - QR rendering, cache backends, logo assets
//! - **API Layer** ([`api`]) - HTTP handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - PNG and SVG output with square, dot, or rounded modules
//! - Square, rounded, or leaf finder patterns with an optional separate color
//! - Centered logo overlay on PNG output
//! - Deterministic cache keys over file or Redis storage
//! - Namespace-wide cache eviction without key enumeration by callers
//!
//! ## Quick Start
//!
//! ```bash
//! export CACHE_BACKEND="file"
//! export CACHE_DIR="./cache"
//!
//! cargo run
//!
//! curl "http://localhost:3000/qr?url=https://s.example.com/abc&size=256&moduleStyle=dots" -o qr.png
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::QrService;
    pub use crate::domain::cache_key::CacheNamespace;
    pub use crate::domain::entities::{Color, OutputFormat, RenderRequest, StyleDefaults};
    pub use crate::domain::style_resolver::RawRenderOptions;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
