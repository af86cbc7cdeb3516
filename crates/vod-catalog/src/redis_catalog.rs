//! Redis-backed catalog.
//!
//! One JSON value per record under `{prefix}video:{id}`, a sorted index set
//! under `{prefix}videos`, and an `INCR` sequence for id allocation.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::info;

use vod_models::{NewVideo, VideoId, VideoRecord};

use crate::catalog::VideoCatalog;
use crate::error::{CatalogError, CatalogResult};

/// Redis catalog configuration.
#[derive(Debug, Clone)]
pub struct RedisCatalogConfig {
    /// Redis URL
    pub redis_url: String,
    /// Prefix applied to every catalog key
    pub key_prefix: String,
}

impl Default for RedisCatalogConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            key_prefix: "vod:catalog:".to_string(),
        }
    }
}

impl RedisCatalogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            key_prefix: std::env::var("CATALOG_KEY_PREFIX")
                .unwrap_or_else(|_| "vod:catalog:".to_string()),
        }
    }
}

/// Catalog backed by Redis.
pub struct RedisCatalog {
    client: redis::Client,
    key_prefix: String,
}

impl RedisCatalog {
    /// Create a new catalog client.
    pub fn new(config: RedisCatalogConfig) -> CatalogResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        Ok(Self {
            client,
            key_prefix: config.key_prefix,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> CatalogResult<Self> {
        Self::new(RedisCatalogConfig::from_env())
    }

    fn record_key(&self, id: VideoId) -> String {
        format!("{}video:{}", self.key_prefix, id)
    }

    fn index_key(&self) -> String {
        format!("{}videos", self.key_prefix)
    }

    fn sequence_key(&self) -> String {
        format!("{}video:seq", self.key_prefix)
    }

    async fn load(
        &self,
        conn: &mut redis::aio::MultiplexedConnection,
        id: VideoId,
    ) -> CatalogResult<Option<VideoRecord>> {
        let raw: Option<String> = conn.get(self.record_key(id)).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        conn: &mut redis::aio::MultiplexedConnection,
        record: &VideoRecord,
    ) -> CatalogResult<()> {
        let json = serde_json::to_string(record)?;
        conn.set::<_, _, ()>(self.record_key(record.id), json).await?;
        Ok(())
    }
}

#[async_trait]
impl VideoCatalog for RedisCatalog {
    async fn create(&self, new: NewVideo) -> CatalogResult<VideoRecord> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let id: i64 = conn.incr(self.sequence_key(), 1).await?;
        let record = new.into_record(VideoId(id));

        self.save(&mut conn, &record).await?;
        conn.sadd::<_, _, ()>(self.index_key(), id).await?;

        info!(video_id = %record.id, "Created video record '{}'", record.title);
        Ok(record)
    }

    async fn get(&self, id: VideoId) -> CatalogResult<Option<VideoRecord>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        self.load(&mut conn, id).await
    }

    async fn list(&self) -> CatalogResult<Vec<VideoRecord>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let mut ids: Vec<i64> = conn.smembers(self.index_key()).await?;
        ids.sort_unstable();

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.load(&mut conn, VideoId(id)).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn set_duration(&self, id: VideoId, duration: &str) -> CatalogResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let mut record = self
            .load(&mut conn, id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        record.video_duration = duration.to_string();
        self.save(&mut conn, &record).await
    }

    async fn set_playlist_url(&self, id: VideoId, url: &str) -> CatalogResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let mut record = self
            .load(&mut conn, id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        record.hls_playlist = Some(url.to_string());
        self.save(&mut conn, &record).await
    }

    async fn delete(&self, id: VideoId) -> CatalogResult<Option<VideoRecord>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let record = self.load(&mut conn, id).await?;
        if record.is_some() {
            conn.del::<_, ()>(self.record_key(id)).await?;
            conn.srem::<_, _, ()>(self.index_key(), id.as_i64()).await?;
            info!(video_id = %id, "Deleted video record");
        }
        Ok(record)
    }
}
