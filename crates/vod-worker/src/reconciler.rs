//! Lifecycle reconciliation on record deletion.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use vod_models::{artifact, VideoRecord};
use vod_storage::{delete_prefix, ObjectStore};

/// Removes everything a deleted video left behind: the local source file
/// and working directory, and the remote artifact namespaces.
///
/// Every step is best-effort. A failure in one namespace never blocks the
/// others, and nothing here can make the record deletion itself fail.
pub struct Reconciler {
    store: Arc<dyn ObjectStore>,
    media_root: PathBuf,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ObjectStore>, media_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            media_root: media_root.into(),
        }
    }

    /// Run both cleanup passes.
    pub async fn cleanup(&self, record: &VideoRecord) {
        self.cleanup_local(record).await;
        self.cleanup_remote(record).await;
    }

    /// Delete the source file and the per-video working directory.
    pub async fn cleanup_local(&self, record: &VideoRecord) {
        let source = self.media_root.join("videos").join(&record.source_file);
        if source.is_file() {
            match tokio::fs::remove_file(&source).await {
                Ok(()) => info!("Deleted source file: {}", source.display()),
                Err(e) => error!("Error deleting source file {}: {}", source.display(), e),
            }
        }

        let work_dir = self.media_root.join("videos").join(record.base_name());
        if work_dir.is_dir() {
            match tokio::fs::remove_dir_all(&work_dir).await {
                Ok(()) => info!("Deleted working directory: {}", work_dir.display()),
                Err(e) => error!(
                    "Error deleting working directory {}: {}",
                    work_dir.display(),
                    e
                ),
            }
        }
    }

    /// Empty the video's remote namespaces: the HLS folder, the poster,
    /// the metadata sidecar folder, and the film folder.
    pub async fn cleanup_remote(&self, record: &VideoRecord) {
        let name = record.base_name();

        for prefix in [
            artifact::hls_prefix(name),
            artifact::text_prefix(name),
            artifact::film_folder_prefix(name),
        ] {
            match delete_prefix(self.store.as_ref(), &prefix).await {
                Ok(deleted) => {
                    info!("Deleted {} remote objects under {}", deleted, prefix)
                }
                Err(e) => warn!("Error deleting remote namespace {}: {}", prefix, e),
            }
        }

        let poster = artifact::poster_key(name);
        if let Err(e) = self.store.delete_key(&poster).await {
            warn!("Error deleting remote poster {}: {}", poster, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::path::Path;
    use tempfile::TempDir;
    use vod_models::{NewVideo, VideoId};
    use vod_storage::{MemoryObjectStore, StorageError, StorageResult};

    fn record() -> VideoRecord {
        NewVideo {
            title: "Clip".to_string(),
            description: "d".to_string(),
            category: String::new(),
            age_rating: String::new(),
            resolution: String::new(),
            release_year: String::new(),
            created_at: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            source_file: "clip.mp4".to_string(),
        }
        .into_record(VideoId(1))
    }

    async fn seed_remote(store: &MemoryObjectStore) {
        for key in [
            "hls/clip/master.m3u8",
            "hls/clip/360p.m3u8",
            "hls/clip/360p_000.ts",
            "text/clip/title.txt",
            "myFilms/clip/placeholder.txt",
            "video-posters/clip.jpg",
            // Another video's artifacts must survive.
            "hls/other/master.m3u8",
        ] {
            store
                .upload_bytes(b"x".to_vec(), key, "application/octet-stream")
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn local_pass_removes_source_and_work_dir() {
        let media_root = TempDir::new().unwrap();
        let videos = media_root.path().join("videos");
        std::fs::create_dir_all(videos.join("clip")).unwrap();
        std::fs::write(videos.join("clip.mp4"), b"source").unwrap();
        std::fs::write(videos.join("clip").join("360p.m3u8"), b"pl").unwrap();

        let store = Arc::new(MemoryObjectStore::new("https://cdn.example.com"));
        let reconciler = Reconciler::new(store, media_root.path());

        reconciler.cleanup_local(&record()).await;

        assert!(!videos.join("clip.mp4").exists());
        assert!(!videos.join("clip").exists());
    }

    #[tokio::test]
    async fn remote_pass_empties_all_namespaces() {
        let media_root = TempDir::new().unwrap();
        let store = Arc::new(MemoryObjectStore::new("https://cdn.example.com"));
        seed_remote(&store).await;

        let reconciler = Reconciler::new(store.clone(), media_root.path());
        reconciler.cleanup(&record()).await;

        assert_eq!(store.keys(), vec!["hls/other/master.m3u8".to_string()]);
    }

    /// Store whose deletes fail for one namespace only.
    struct FailingDeletes {
        inner: MemoryObjectStore,
        failing_prefix: String,
    }

    #[async_trait]
    impl ObjectStore for FailingDeletes {
        async fn upload_file(
            &self,
            path: &Path,
            key: &str,
            content_type: &str,
        ) -> StorageResult<()> {
            self.inner.upload_file(path, key, content_type).await
        }

        async fn upload_bytes(
            &self,
            data: Vec<u8>,
            key: &str,
            content_type: &str,
        ) -> StorageResult<()> {
            self.inner.upload_bytes(data, key, content_type).await
        }

        async fn download_bytes(&self, key: &str) -> StorageResult<Vec<u8>> {
            self.inner.download_bytes(key).await
        }

        async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>> {
            self.inner.list_keys(prefix).await
        }

        async fn delete_key(&self, key: &str) -> StorageResult<()> {
            if key.starts_with(&self.failing_prefix) {
                return Err(StorageError::delete_failed("simulated outage"));
            }
            self.inner.delete_key(key).await
        }

        async fn exists(&self, key: &str) -> StorageResult<bool> {
            self.inner.exists(key).await
        }

        fn public_url(&self, key: &str) -> String {
            self.inner.public_url(key)
        }
    }

    #[tokio::test]
    async fn one_failing_namespace_does_not_block_the_others() {
        let media_root = TempDir::new().unwrap();
        let inner = MemoryObjectStore::new("https://cdn.example.com");
        seed_remote(&inner).await;

        let store = Arc::new(FailingDeletes {
            inner,
            failing_prefix: "text/".to_string(),
        });

        let reconciler = Reconciler::new(store.clone(), media_root.path());
        reconciler.cleanup(&record()).await;

        let remaining = store.list_keys("").await.unwrap();
        // The failing namespace keeps its object; every other one is empty.
        assert_eq!(
            remaining,
            vec![
                "hls/other/master.m3u8".to_string(),
                "text/clip/title.txt".to_string(),
            ]
        );
    }
}
