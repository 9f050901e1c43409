//! File-backed cache implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, info, warn};

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::cache_key::CacheNamespace;

/// Extension of committed cache entries.
const ENTRY_EXTENSION: &str = "cache";
/// Extension of in-flight writes, renamed into place when complete.
const TEMP_EXTENSION: &str = "tmp";
/// Prefix of the scratch file written by health checks.
const HEALTH_MARKER: &str = ".health";
/// Directory for keys without a recognized namespace prefix.
const FALLBACK_DIR: &str = "misc";
/// Size of the big-endian TTL header preceding the payload.
const HEADER_LEN: usize = 8;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A cache entry as stored on disk.
///
/// `written_at` is the file's modification time; `ttl_seconds` is read from
/// the entry header.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub payload: Vec<u8>,
    pub written_at: DateTime<Utc>,
    pub ttl_seconds: u64,
}

impl CacheEntry {
    /// Whether the entry is no longer servable at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.written_at).num_seconds().max(0);
        age as u64 >= self.ttl_seconds
    }

    fn encode(payload: &[u8], ttl_seconds: u64) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
        buf.extend_from_slice(&ttl_seconds.to_be_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    fn decode(mut raw: Vec<u8>, written_at: DateTime<Utc>) -> Option<Self> {
        if raw.len() < HEADER_LEN {
            return None;
        }
        let header: [u8; HEADER_LEN] = raw[..HEADER_LEN].try_into().ok()?;
        let payload = raw.split_off(HEADER_LEN);

        Some(Self {
            payload,
            written_at,
            ttl_seconds: u64::from_be_bytes(header),
        })
    }
}

/// Cache storing one file per entry under `<root>/<namespace>/`.
///
/// Expiry is lazy: an entry whose age (by mtime) reaches its TTL is deleted
/// by the read that finds it. There is no background sweep. Writes go to a
/// temporary file that is renamed into place, so readers never observe a
/// partial entry.
pub struct FileCache {
    root: PathBuf,
    default_ttl: u64,
}

impl FileCache {
    /// Creates the cache, creating `root` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] if the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>, default_ttl_seconds: u64) -> CacheResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        info!("✓ File cache at {}", root.display());

        Ok(Self {
            root,
            default_ttl: default_ttl_seconds,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_dir(&self, namespace: Option<CacheNamespace>) -> PathBuf {
        self.root
            .join(namespace.map(|ns| ns.as_str()).unwrap_or(FALLBACK_DIR))
    }

    /// On-disk location of `key`: namespace directory plus a digest of the key.
    fn path_for(&self, key: &str) -> PathBuf {
        let digest = hex::encode(Sha256::digest(key.as_bytes()));
        self.namespace_dir(CacheNamespace::of_key(key))
            .join(format!("{digest}.{ENTRY_EXTENSION}"))
    }

    /// Reads the entry for `key` regardless of expiry.
    async fn read_entry(&self, key: &str) -> std::io::Result<Option<CacheEntry>> {
        let path = self.path_for(key);

        let metadata = match fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        let written_at = DateTime::<Utc>::from(metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH));

        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        match CacheEntry::decode(raw, written_at) {
            Some(entry) => Ok(Some(entry)),
            None => {
                warn!("Discarding malformed cache file {}", path.display());
                remove_quietly(&path).await;
                Ok(None)
            }
        }
    }

    async fn write_entry(&self, key: &str, payload: &[u8], ttl_seconds: u64) -> std::io::Result<()> {
        let path = self.path_for(key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let temp = path.with_extension(format!(
            "{}.{}.{}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed),
            TEMP_EXTENSION
        ));

        fs::write(&temp, CacheEntry::encode(payload, ttl_seconds)).await?;
        if let Err(e) = fs::rename(&temp, &path).await {
            remove_quietly(&temp).await;
            return Err(e);
        }
        Ok(())
    }
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path).await
        && e.kind() != ErrorKind::NotFound
    {
        warn!("Failed to remove {}: {}", path.display(), e);
    }
}

#[async_trait]
impl CacheService for FileCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        match self.read_entry(key).await {
            Ok(Some(entry)) if entry.is_expired(Utc::now()) => {
                debug!("Cache EXPIRED: {}", key);
                remove_quietly(&self.path_for(key)).await;
                Ok(None)
            }
            Ok(Some(entry)) => {
                debug!("Cache HIT: {} ({} bytes)", key, entry.payload.len());
                Ok(Some(entry.payload))
            }
            Ok(None) => {
                debug!("Cache MISS: {}", key);
                Ok(None)
            }
            Err(e) => {
                warn!("File cache read error for {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, payload: &[u8], ttl_seconds: Option<u64>) -> CacheResult<()> {
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        match self.write_entry(key, payload, ttl).await {
            Ok(()) => debug!("Cache SET: {} ({} bytes, TTL: {}s)", key, payload.len(), ttl),
            Err(e) => warn!("File cache write error for {}: {}", key, e),
        }
        Ok(())
    }

    async fn clear_namespace(&self, namespace: CacheNamespace) -> CacheResult<u64> {
        let dir = self.namespace_dir(Some(namespace));

        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(CacheError::Io(e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            match path.extension().and_then(|ext| ext.to_str()) {
                Some(ENTRY_EXTENSION) => match fs::remove_file(&path).await {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => return Err(CacheError::Io(e)),
                },
                Some(TEMP_EXTENSION) => remove_quietly(&path).await,
                _ => {}
            }
        }

        info!("Cleared {} entries from file cache namespace {}", removed, namespace);
        Ok(removed)
    }

    /// Writes and removes a marker file under the root.
    async fn health_check(&self) -> bool {
        let marker = self.root.join(format!(
            "{}.{}.{}.{}",
            HEALTH_MARKER,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed),
            TEMP_EXTENSION
        ));

        if let Err(e) = fs::write(&marker, b"ok").await {
            warn!("File cache at {} is not writable: {}", self.root.display(), e);
            return false;
        }
        match fs::remove_file(&marker).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to remove health marker {}: {}", marker.display(), e);
                false
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
