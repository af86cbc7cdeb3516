//! The cache capability and the read-through helper.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, warn};

use crate::error::CacheResult;

/// Fixed expiry for every pipeline cache key, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Version stamped into every cached envelope. Bump when a cached shape
/// changes; old entries then read as misses instead of deserializing into
/// the wrong shape.
pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// Capability for expiring key/value byte storage.
#[async_trait]
pub trait ByteCache: Send + Sync {
    /// Fetch the value at `key`, if present and unexpired.
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Store `value` at `key` with an expiry of `ttl_secs`.
    async fn set_ex(&self, key: &str, value: &[u8], ttl_secs: u64) -> CacheResult<()>;

    /// Drop the value at `key`.
    async fn delete(&self, key: &str) -> CacheResult<()>;
}

/// Envelope wrapping every cached value with its schema version.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    v: u32,
    data: T,
}

/// Read-through lookup: serve `key` from the cache, or compute, store with
/// `ttl_secs`, and return.
///
/// Cache transport failures and undecodable entries degrade to the compute
/// path; only the compute function's own error propagates.
pub async fn get_or_compute<T, E, F, Fut>(
    cache: &dyn ByteCache,
    key: &str,
    ttl_secs: u64,
    compute: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_slice::<Envelope<T>>(&raw) {
            Ok(envelope) if envelope.v == CACHE_SCHEMA_VERSION => {
                debug!(key = %key, "Cache hit");
                return Ok(envelope.data);
            }
            Ok(envelope) => {
                debug!(key = %key, version = envelope.v, "Cached schema version mismatch, recomputing");
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Undecodable cache entry, recomputing");
            }
        },
        Ok(None) => debug!(key = %key, "Cache miss"),
        Err(e) => warn!(key = %key, error = %e, "Cache read failed, recomputing"),
    }

    let value = compute().await?;

    let envelope = Envelope {
        v: CACHE_SCHEMA_VERSION,
        data: &value,
    };
    match serde_json::to_vec(&envelope) {
        Ok(raw) => {
            if let Err(e) = cache.set_ex(key, &raw, ttl_secs).await {
                warn!(key = %key, error = %e, "Cache write failed");
            }
        }
        Err(e) => warn!(key = %key, error = %e, "Cache serialization failed"),
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCache;
    use std::sync::atomic::{AtomicU32, Ordering};

    async fn counted_compute(counter: &AtomicU32) -> Result<Vec<String>, std::io::Error> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(vec!["a".to_string(), "b".to_string()])
    }

    #[tokio::test]
    async fn computes_once_within_ttl() {
        let cache = MemoryCache::new();
        let calls = AtomicU32::new(0);

        let first: Vec<String> =
            get_or_compute(&cache, "poster_urls", DEFAULT_TTL_SECS, || {
                counted_compute(&calls)
            })
            .await
            .unwrap();
        let second: Vec<String> =
            get_or_compute(&cache, "poster_urls", DEFAULT_TTL_SECS, || {
                counted_compute(&calls)
            })
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recomputes_after_expiry() {
        let cache = MemoryCache::new();
        let calls = AtomicU32::new(0);

        // A zero TTL expires immediately.
        let _: Vec<String> = get_or_compute(&cache, "k", 0, || counted_compute(&calls))
            .await
            .unwrap();
        let _: Vec<String> = get_or_compute(&cache, "k", 0, || counted_compute(&calls))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn corrupt_entries_read_as_misses() {
        let cache = MemoryCache::new();
        cache.set_ex("k", b"not json", 3600).await.unwrap();

        let calls = AtomicU32::new(0);
        let value: Vec<String> = get_or_compute(&cache, "k", 3600, || counted_compute(&calls))
            .await
            .unwrap();

        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn version_mismatch_reads_as_miss() {
        let cache = MemoryCache::new();
        let stale = serde_json::to_vec(&serde_json::json!({
            "v": CACHE_SCHEMA_VERSION + 1,
            "data": ["old"],
        }))
        .unwrap();
        cache.set_ex("k", &stale, 3600).await.unwrap();

        let calls = AtomicU32::new(0);
        let value: Vec<String> = get_or_compute(&cache, "k", 3600, || counted_compute(&calls))
            .await
            .unwrap();

        assert_eq!(value, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn compute_error_propagates() {
        let cache = MemoryCache::new();
        let result: Result<Vec<String>, std::io::Error> =
            get_or_compute(&cache, "k", 3600, || async {
                Err(std::io::Error::other("listing failed"))
            })
            .await;
        assert!(result.is_err());
    }
}
