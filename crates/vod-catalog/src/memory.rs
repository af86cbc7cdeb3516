//! In-memory catalog for tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use vod_models::{NewVideo, VideoId, VideoRecord};

use crate::catalog::VideoCatalog;
use crate::error::{CatalogError, CatalogResult};

/// Catalog held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    records: RwLock<BTreeMap<i64, VideoRecord>>,
    sequence: AtomicI64,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an existing record verbatim (test setup helper).
    pub async fn insert(&self, record: VideoRecord) {
        let id = record.id.as_i64();
        self.sequence.fetch_max(id, Ordering::SeqCst);
        self.records.write().await.insert(id, record);
    }
}

#[async_trait]
impl VideoCatalog for MemoryCatalog {
    async fn create(&self, new: NewVideo) -> CatalogResult<VideoRecord> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let record = new.into_record(VideoId(id));
        self.records.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: VideoId) -> CatalogResult<Option<VideoRecord>> {
        Ok(self.records.read().await.get(&id.as_i64()).cloned())
    }

    async fn list(&self) -> CatalogResult<Vec<VideoRecord>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn set_duration(&self, id: VideoId, duration: &str) -> CatalogResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id.as_i64())
            .ok_or(CatalogError::NotFound(id))?;
        record.video_duration = duration.to_string();
        Ok(())
    }

    async fn set_playlist_url(&self, id: VideoId, url: &str) -> CatalogResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id.as_i64())
            .ok_or(CatalogError::NotFound(id))?;
        record.hls_playlist = Some(url.to_string());
        Ok(())
    }

    async fn delete(&self, id: VideoId) -> CatalogResult<Option<VideoRecord>> {
        Ok(self.records.write().await.remove(&id.as_i64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_video(title: &str) -> NewVideo {
        NewVideo {
            title: title.to_string(),
            description: "d".to_string(),
            category: String::new(),
            age_rating: String::new(),
            resolution: String::new(),
            release_year: String::new(),
            created_at: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            source_file: format!("{}.mp4", title),
        }
    }

    #[tokio::test]
    async fn creates_with_sequential_ids() {
        let catalog = MemoryCatalog::new();
        let a = catalog.create(new_video("a")).await.unwrap();
        let b = catalog.create(new_video("b")).await.unwrap();
        assert_eq!(a.id, VideoId(1));
        assert_eq!(b.id, VideoId(2));
    }

    #[tokio::test]
    async fn mutations_update_the_stored_record() {
        let catalog = MemoryCatalog::new();
        let record = catalog.create(new_video("clip")).await.unwrap();

        catalog.set_duration(record.id, "00:10:00").await.unwrap();
        catalog
            .set_playlist_url(record.id, "https://cdn/hls/clip/master.m3u8")
            .await
            .unwrap();

        let stored = catalog.get(record.id).await.unwrap().unwrap();
        assert_eq!(stored.video_duration, "00:10:00");
        assert_eq!(
            stored.hls_playlist.as_deref(),
            Some("https://cdn/hls/clip/master.m3u8")
        );
    }

    #[tokio::test]
    async fn delete_returns_the_record_once() {
        let catalog = MemoryCatalog::new();
        let record = catalog.create(new_video("clip")).await.unwrap();

        assert!(catalog.delete(record.id).await.unwrap().is_some());
        assert!(catalog.delete(record.id).await.unwrap().is_none());
        assert!(catalog.get(record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mutating_a_missing_record_is_an_error() {
        let catalog = MemoryCatalog::new();
        let err = catalog.set_duration(VideoId(99), "00:01:00").await;
        assert!(matches!(err, Err(CatalogError::NotFound(_))));
    }
}
