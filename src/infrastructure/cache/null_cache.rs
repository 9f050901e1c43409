//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::cache_key::CacheNamespace;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when caching is explicitly disabled (`CACHE_BACKEND=none`) or the
/// configured backend could not be initialized. Every read is a miss, so
/// every request renders fresh.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _payload: &[u8], _ttl_seconds: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn clear_namespace(&self, _namespace: CacheNamespace) -> CacheResult<u64> {
        Ok(0)
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_never_hits() {
        let cache = NullCache::new();
        cache.set("qr:abc", b"payload", Some(60)).await.unwrap();

        assert!(cache.get("qr:abc").await.unwrap().is_none());
        assert_eq!(cache.clear_namespace(CacheNamespace::Qr).await.unwrap(), 0);
        assert!(cache.health_check().await);
    }
}
