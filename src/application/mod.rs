//! Application layer services.
//!
//! Services coordinate the domain (style resolution, cache keys) with the
//! infrastructure traits (renderer, logo repository, cache backend) and give
//! HTTP handlers and the admin CLI one entry point.
//!
//! # Available Services
//!
//! - [`services::qr_service::QrService`] - Cached QR rendering, data URLs, bulk eviction

pub mod services;
