//! Redis-backed cache implementation.

use super::namespace_index::NamespaceIndex;
use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::cache_key::CacheNamespace;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, Pipeline, RedisResult, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache for rendered payloads.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection reuse.
/// Expiry is delegated to Redis (`SET EX`). Every write also records the key
/// in a [`NamespaceIndex`] so a namespace can be cleared without `SCAN`.
/// Reads and writes are fail-open: errors are logged but don't propagate to callers.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    index: NamespaceIndex,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`CacheService::set`] is called
    ///   with `ttl_seconds = None`; controlled via `QR_CACHE_TTL_SECONDS` env var
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            index: NamespaceIndex::default(),
        })
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.client.clone();

        match conn.get::<_, Option<Vec<u8>>>(key).await {
            Ok(Some(payload)) => {
                debug!("Cache HIT: {} ({} bytes)", key, payload.len());
                Ok(Some(payload))
            }
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, payload: &[u8], ttl_seconds: Option<u64>) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let pipe = write_pipeline(&self.index, key, payload, ttl);
        let result: RedisResult<()> = pipe.query_async(&mut conn).await;
        match result {
            Ok(()) => {
                debug!("Cache SET: {} ({} bytes, TTL: {}s)", key, payload.len(), ttl);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", key, e);
                Ok(())
            }
        }
    }

    async fn clear_namespace(&self, namespace: CacheNamespace) -> CacheResult<u64> {
        let mut conn = self.client.clone();

        let removed = self
            .index
            .drain(&mut conn, namespace)
            .await
            .map_err(|e| CacheError::OperationError(format!("Failed to clear {}: {}", namespace, e)))?;

        info!("Cleared {} entries from Redis namespace {}", removed, namespace);
        Ok(removed)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

/// `MULTI`/`EXEC` block storing `payload` under `key` and indexing the key
/// under its namespace.
fn write_pipeline(index: &NamespaceIndex, key: &str, payload: &[u8], ttl: u64) -> Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic().set_ex(key, payload, ttl).ignore();
    match CacheNamespace::of_key(key) {
        Some(namespace) => index.record(&mut pipe, namespace, key),
        None => warn!("Key {} has no namespace; it will not be bulk-clearable", key),
    }
    pipe
}
