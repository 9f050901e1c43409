//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

use crate::domain::cache_key::CacheNamespace;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
    Io(std::io::Error),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
            Self::Io(e) => write!(f, "Cache I/O error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<std::io::Error> for CacheError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Backend-agnostic store for rendered payloads.
///
/// Implementations must be thread-safe and degrade gracefully: a broken
/// backend turns reads into misses and writes into no-ops, so a request can
/// always be served by rendering fresh.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::FileCache`] - Files on local disk, mtime-governed TTL
/// - [`crate::infrastructure::cache::RedisCache`] - Redis with native TTL and a namespace index
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves a cached payload.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(bytes))` on cache hit
    /// - `Ok(None)` on cache miss, expiry, or error (fail-open behavior)
    ///
    /// # Errors
    ///
    /// Should not return errors in production implementations. Errors are logged
    /// and treated as cache misses.
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Stores a payload with optional TTL.
    ///
    /// # Arguments
    ///
    /// - `key` - Namespaced cache key (e.g. `qr:<digest>`)
    /// - `payload` - Bytes to cache
    /// - `ttl_seconds` - Optional TTL in seconds (backend default if None)
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations should log errors
    /// and return `Ok(())` to avoid disrupting the request flow.
    async fn set(&self, key: &str, payload: &[u8], ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes every entry under `namespace` and returns how many were removed.
    ///
    /// Not linearizable with concurrent writes: an entry stored while the
    /// clear is in progress may survive it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot enumerate or delete entries.
    async fn clear_namespace(&self, namespace: CacheNamespace) -> CacheResult<u64>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by health check endpoints to report cache status.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}
