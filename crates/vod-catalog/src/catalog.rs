//! The catalog capability.

use async_trait::async_trait;

use vod_models::{NewVideo, VideoId, VideoRecord};

use crate::error::CatalogResult;

/// Capability for the video record store.
///
/// `create` is the committing write: once it returns, the record is visible
/// to any reader, which is what makes enqueue-after-create safe.
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    /// Persist a new record, allocating its id.
    async fn create(&self, new: NewVideo) -> CatalogResult<VideoRecord>;

    /// Fetch a record by id.
    async fn get(&self, id: VideoId) -> CatalogResult<Option<VideoRecord>>;

    /// All records.
    async fn list(&self) -> CatalogResult<Vec<VideoRecord>>;

    /// Set the probed stream duration.
    async fn set_duration(&self, id: VideoId, duration: &str) -> CatalogResult<()>;

    /// Set the public master-playlist URL after a successful publish.
    async fn set_playlist_url(&self, id: VideoId, url: &str) -> CatalogResult<()>;

    /// Remove a record, returning it if it existed.
    async fn delete(&self, id: VideoId) -> CatalogResult<Option<VideoRecord>>;
}
