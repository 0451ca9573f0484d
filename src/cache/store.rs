//! Key-value cache storage.
//!
//! `KeyValueCache` is the seam to whatever shared cache the platform runs
//! (memcached, redis, ...). `MemoryCache` is the in-process implementation:
//! LRU-bounded with a per-entry expiry.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::Instant;
use tracing::warn;

use super::config::CacheConfig;
use super::keys::CacheKey;
use super::lock::lock_or_recover;

const SOURCE: &str = "cache::store";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("failed to encode cache entry `{key}`: {message}")]
    Codec { key: String, message: String },
}

impl CacheError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Read a JSON-encoded entry.
///
/// An entry that no longer decodes is reported as a miss; the caller
/// repopulates it from the backing store.
pub async fn get_json<T>(cache: &dyn KeyValueCache, key: &CacheKey) -> Result<Option<T>, CacheError>
where
    T: DeserializeOwned,
{
    let rendered = key.to_string();
    let Some(raw) = cache.get(&rendered).await? else {
        return Ok(None);
    };

    match serde_json::from_slice(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(
                key = %rendered,
                error = %err,
                "Discarding undecodable cache entry"
            );
            Ok(None)
        }
    }
}

/// Store a JSON-encoded entry with the given lifetime.
pub async fn set_json<T>(
    cache: &dyn KeyValueCache,
    key: &CacheKey,
    value: &T,
    ttl: Duration,
) -> Result<(), CacheError>
where
    T: Serialize + ?Sized,
{
    let rendered = key.to_string();
    let encoded = serde_json::to_vec(value).map_err(|err| CacheError::Codec {
        key: rendered.clone(),
        message: err.to_string(),
    })?;
    cache.set(&rendered, Bytes::from(encoded), ttl).await
}

struct Entry {
    value: Bytes,
    /// `None` when the lifetime reaches past what the clock can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| deadline > now)
    }
}

/// In-process LRU cache with per-entry TTL.
pub struct MemoryCache {
    entries: Mutex<LruCache<String, Entry>>,
}

impl MemoryCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(config.max_entries_non_zero())),
        }
    }

    pub fn len(&self) -> usize {
        lock_or_recover(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let mut entries = lock_or_recover(&self.entries, SOURCE, "get");
        match entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.is_live(Instant::now()) => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => {}
        }
        entries.pop(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        let entry = Entry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        };
        lock_or_recover(&self.entries, SOURCE, "set").put(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        lock_or_recover(&self.entries, SOURCE, "delete").pop(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;
    use crate::domain::types::UserId;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = MemoryCache::new(&CacheConfig::default());
        cache
            .set("k", Bytes::from_static(b"v"), TTL)
            .await
            .expect("set");

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(
            cache.get("k").await.expect("get"),
            Some(Bytes::from_static(b"v"))
        );

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("k").await.expect("get"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unrepresentable_ttl_never_expires() {
        let cache = MemoryCache::new(&CacheConfig::default());
        cache
            .set("k", Bytes::from_static(b"v"), Duration::from_secs(u64::MAX))
            .await
            .expect("set");

        tokio::time::advance(Duration::from_secs(86_400 * 365)).await;
        assert_eq!(
            cache.get("k").await.expect("get"),
            Some(Bytes::from_static(b"v"))
        );
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let cache = MemoryCache::new(&CacheConfig::default());
        cache
            .set("k", Bytes::from_static(b"v"), TTL)
            .await
            .expect("set");
        cache.delete("k").await.expect("delete");
        assert_eq!(cache.get("k").await.expect("get"), None);
    }

    #[tokio::test]
    async fn lru_eviction_bounds_entries() {
        let config = CacheConfig {
            max_entries: 2,
            ..Default::default()
        };
        let cache = MemoryCache::new(&config);

        for key in ["a", "b", "c"] {
            cache
                .set(key, Bytes::from_static(b"v"), TTL)
                .await
                .expect("set");
        }

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").await.expect("get"), None);
        assert!(cache.get("c").await.expect("get").is_some());
    }

    #[tokio::test]
    async fn json_helpers_round_trip_and_skip_garbage() {
        let cache = MemoryCache::new(&CacheConfig::default());
        let key = CacheKey::UserStats(UserId(3));

        set_json(&cache, &key, &vec![1_u64, 2, 3], TTL)
            .await
            .expect("set");
        let stored: Option<Vec<u64>> = get_json(&cache, &key).await.expect("get");
        assert_eq!(stored, Some(vec![1, 2, 3]));

        cache
            .set(&key.to_string(), Bytes::from_static(b"not json"), TTL)
            .await
            .expect("set");
        let garbage: Option<Vec<u64>> = get_json(&cache, &key).await.expect("get");
        assert_eq!(garbage, None);
    }

    #[tokio::test]
    async fn store_recovers_from_poisoned_lock() {
        let cache = MemoryCache::new(&CacheConfig::default());

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = cache.entries.lock().expect("entries lock should be acquired");
            panic!("poison entries lock");
        }));

        cache
            .set("k", Bytes::from_static(b"v"), TTL)
            .await
            .expect("set");
        assert!(cache.get("k").await.expect("get").is_some());
    }
}
