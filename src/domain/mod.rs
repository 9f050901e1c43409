//! Domain layer containing the render data model and collaborator contracts.
//!
//! The domain layer has no dependency on the QR encoder, the raster backend,
//! or any cache backend.
//!
//! # Architecture
//!
//! - [`entities`] - Colors, render requests, style vocabulary, defaults
//! - [`style_resolver`] - Lenient option parsing, clamping and defaulting
//! - [`cache_key`] - Namespaces and deterministic cache keys
//! - [`renderer`] - The [`renderer::QrRenderer`] seam
//! - [`repositories`] - Logo asset lookup
//!
//! # Generation Flow
//!
//! 1. Raw options are resolved into a [`entities::RenderRequest`]
//! 2. A cache key is built from the resolved request
//! 3. On a cache miss the renderer produces the bytes
//! 4. PNG output with a logo reference is passed to the logo compositor
//! 5. The result is written back to the cache

pub mod cache_key;
pub mod entities;
pub mod renderer;
pub mod repositories;
pub mod style_resolver;
