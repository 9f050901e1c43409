//! Caching layer for rendered QR payloads.
//!
//! Provides a [`CacheService`] trait with three implementations, selected by
//! the `CACHE_BACKEND` setting:
//! - [`FileCache`] - One file per entry, lazy mtime-based expiry
//! - [`RedisCache`] - Redis with native TTL and a [`NamespaceIndex`] for bulk clears
//! - [`NullCache`] - No-op implementation for testing/disabled caching

mod file_cache;
mod namespace_index;
mod null_cache;
mod redis_cache;
mod service;

pub use file_cache::{CacheEntry, FileCache};
pub use namespace_index::NamespaceIndex;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};

#[cfg(test)]
pub use service::MockCacheService;
