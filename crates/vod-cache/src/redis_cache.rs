//! Redis cache backend.

use async_trait::async_trait;
use redis::AsyncCommands;

use crate::cache::ByteCache;
use crate::error::CacheResult;

/// Redis cache configuration.
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis URL
    pub redis_url: String,
    /// Prefix applied to every cache key
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            key_prefix: "vod:cache:".to_string(),
        }
    }
}

impl RedisCacheConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            key_prefix: std::env::var("CACHE_KEY_PREFIX")
                .unwrap_or_else(|_| "vod:cache:".to_string()),
        }
    }
}

/// Cache backed by Redis `SET .. EX` / `GET`.
pub struct RedisCache {
    client: redis::Client,
    key_prefix: String,
}

impl RedisCache {
    /// Create a new cache client.
    pub fn new(config: RedisCacheConfig) -> CacheResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        Ok(Self {
            client,
            key_prefix: config.key_prefix,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> CacheResult<Self> {
        Self::new(RedisCacheConfig::from_env())
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ByteCache for RedisCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<Vec<u8>> = conn.get(self.prefixed(key)).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &[u8], ttl_secs: u64) -> CacheResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(self.prefixed(key), value, ttl_secs)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(self.prefixed(key)).await?;
        Ok(())
    }
}
