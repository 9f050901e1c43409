//! Membership index enabling bulk eviction on a KV store without prefix scan.

use redis::aio::ConnectionLike;
use redis::{AsyncCommands, Pipeline, RedisResult};
use tracing::debug;

use crate::domain::cache_key::CacheNamespace;

/// Keys deleted per `DEL` round trip when draining an index.
const DELETE_BATCH: usize = 500;

/// One Redis set per namespace holding every live key written under it.
///
/// Members are recorded in the same transaction as the value they index.
/// Members whose value already expired stay in the set until the next drain;
/// deleting them then is a no-op.
#[derive(Debug, Clone)]
pub struct NamespaceIndex {
    prefix: String,
}

impl NamespaceIndex {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Redis key of the membership set for `namespace`.
    pub fn set_key(&self, namespace: CacheNamespace) -> String {
        format!("{}{}", self.prefix, namespace.as_str())
    }

    /// Queues the `SADD` recording `key` onto `pipe`.
    pub fn record(&self, pipe: &mut Pipeline, namespace: CacheNamespace, key: &str) {
        pipe.sadd(self.set_key(namespace), key).ignore();
    }

    /// Deletes every member of the namespace's set, then the set itself.
    ///
    /// Returns the number of members found.
    pub async fn drain<C>(&self, conn: &mut C, namespace: CacheNamespace) -> RedisResult<u64>
    where
        C: ConnectionLike + Send + Sync,
    {
        let set_key = self.set_key(namespace);
        let members: Vec<String> = conn.smembers(&set_key).await?;

        for batch in members.chunks(DELETE_BATCH) {
            let deleted: i64 = conn.del(batch.to_vec()).await?;
            debug!("Deleted {} of {} indexed keys", deleted, batch.len());
        }

        let _: i64 = conn.del(&set_key).await?;
        Ok(members.len() as u64)
    }
}

impl Default for NamespaceIndex {
    fn default() -> Self {
        Self::new("cache_index:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redis::Value;
    use redis_test::{MockCmd, MockRedisConnection};

    fn members(keys: &[String]) -> Value {
        Value::Array(
            keys.iter()
                .map(|k| Value::BulkString(k.as_bytes().to_vec()))
                .collect(),
        )
    }

    fn del(keys: &[String]) -> redis::Cmd {
        let mut cmd = redis::cmd("DEL");
        for key in keys {
            cmd.arg(key);
        }
        cmd
    }

    #[test]
    fn test_set_key_per_namespace() {
        let index = NamespaceIndex::default();
        assert_eq!(index.set_key(CacheNamespace::Qr), "cache_index:qr");
        assert_eq!(index.set_key(CacheNamespace::Device), "cache_index:device");
    }

    #[test]
    fn test_record_queues_sadd() {
        let index = NamespaceIndex::default();
        let mut pipe = redis::pipe();
        index.record(&mut pipe, CacheNamespace::Qr, "qr:abc");

        let packed = String::from_utf8_lossy(&pipe.get_packed_pipeline()).to_string();
        assert!(packed.contains("SADD"));
        assert!(packed.contains("cache_index:qr"));
        assert!(packed.contains("qr:abc"));
    }

    #[tokio::test]
    async fn test_drain_deletes_members_then_set() {
        let keys = vec!["qr:a".to_string(), "qr:b".to_string()];
        let mut conn = MockRedisConnection::new(vec![
            MockCmd::new(redis::cmd("SMEMBERS").arg("cache_index:qr"), Ok(members(&keys))),
            MockCmd::new(del(&keys), Ok(Value::Int(2))),
            MockCmd::new(redis::cmd("DEL").arg("cache_index:qr"), Ok(Value::Int(1))),
        ]);

        let removed = NamespaceIndex::default()
            .drain(&mut conn, CacheNamespace::Qr)
            .await
            .unwrap();
        assert_eq!(removed, 2);
    }

    #[tokio::test]
    async fn test_drain_counts_members_even_if_values_expired() {
        let keys = vec!["device:x".to_string()];
        let mut conn = MockRedisConnection::new(vec![
            MockCmd::new(redis::cmd("SMEMBERS").arg("cache_index:device"), Ok(members(&keys))),
            MockCmd::new(del(&keys), Ok(Value::Int(0))),
            MockCmd::new(redis::cmd("DEL").arg("cache_index:device"), Ok(Value::Int(1))),
        ]);

        let removed = NamespaceIndex::default()
            .drain(&mut conn, CacheNamespace::Device)
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn test_drain_empty_namespace_only_deletes_set() {
        let mut conn = MockRedisConnection::new(vec![
            MockCmd::new(redis::cmd("SMEMBERS").arg("cache_index:qr"), Ok(Value::Array(vec![]))),
            MockCmd::new(redis::cmd("DEL").arg("cache_index:qr"), Ok(Value::Int(0))),
        ]);

        let removed = NamespaceIndex::default()
            .drain(&mut conn, CacheNamespace::Qr)
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn test_drain_batches_large_namespaces() {
        let keys: Vec<String> = (0..DELETE_BATCH + 1).map(|i| format!("qr:{i}")).collect();
        let mut conn = MockRedisConnection::new(vec![
            MockCmd::new(redis::cmd("SMEMBERS").arg("cache_index:qr"), Ok(members(&keys))),
            MockCmd::new(del(&keys[..DELETE_BATCH]), Ok(Value::Int(DELETE_BATCH as i64))),
            MockCmd::new(del(&keys[DELETE_BATCH..]), Ok(Value::Int(1))),
            MockCmd::new(redis::cmd("DEL").arg("cache_index:qr"), Ok(Value::Int(1))),
        ]);

        let removed = NamespaceIndex::default()
            .drain(&mut conn, CacheNamespace::Qr)
            .await
            .unwrap();
        assert_eq!(removed, DELETE_BATCH as u64 + 1);
    }
}
