//! Best-effort artifact publishing.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::store::ObjectStore;

/// Map a local artifact to its upload content type by extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("m3u8") => "application/vnd.apple.mpegurl",
        Some("ts") => "video/mp2t",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Publisher with the pipeline's upload contract: a missing local file is a
/// logged skip, a transport error is logged and absorbed. Upload failures
/// must never crash the job; a partially published artifact set is an
/// accepted outcome, visible only through logs and metrics.
#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
}

impl Publisher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Upload `local` to `key`. Returns whether an upload actually happened.
    pub async fn publish_file(&self, local: impl AsRef<Path>, key: &str) -> bool {
        let local = local.as_ref();

        if !local.is_file() {
            warn!(
                "Skipping upload of {}: local file {} does not exist",
                key,
                local.display()
            );
            return false;
        }

        match self
            .store
            .upload_file(local, key, content_type_for(local))
            .await
        {
            Ok(()) => {
                debug!("Published {} as {}", local.display(), key);
                true
            }
            Err(e) => {
                error!("Error uploading {} to {}: {}", local.display(), key, e);
                false
            }
        }
    }

    /// Upload UTF-8 text to `key`, best-effort.
    pub async fn publish_text(&self, key: &str, content: &str) -> bool {
        match self
            .store
            .upload_bytes(
                content.as_bytes().to_vec(),
                key,
                "text/plain; charset=utf-8",
            )
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!("Error uploading text to {}: {}", key, e);
                false
            }
        }
    }

    /// Upload UTF-8 text to `key` only if no object exists there yet.
    /// Returns whether an upload happened.
    pub async fn publish_text_if_absent(&self, key: &str, content: &str) -> bool {
        match self.store.exists(key).await {
            Ok(true) => {
                debug!("Skipping upload of {}: already present", key);
                false
            }
            Ok(false) => self.publish_text(key, content).await,
            Err(e) => {
                error!("Error checking existence of {}: {}", key, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryObjectStore;
    use std::io::Write;

    fn publisher_with_store() -> (Publisher, Arc<MemoryObjectStore>) {
        let store = Arc::new(MemoryObjectStore::new("https://cdn.example.com"));
        (Publisher::new(store.clone()), store)
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(
            content_type_for(Path::new("master.m3u8")),
            "application/vnd.apple.mpegurl"
        );
        assert_eq!(content_type_for(Path::new("720p_000.ts")), "video/mp2t");
        assert_eq!(content_type_for(Path::new("clip.jpg")), "image/jpeg");
        assert_eq!(
            content_type_for(Path::new("segment")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn missing_local_file_is_a_silent_skip() {
        let (publisher, store) = publisher_with_store();

        let uploaded = publisher
            .publish_file("/no/such/file.m3u8", "hls/clip/master.m3u8")
            .await;

        assert!(!uploaded);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn existing_file_is_uploaded() {
        let (publisher, store) = publisher_with_store();

        let mut file = tempfile::NamedTempFile::with_suffix(".m3u8").unwrap();
        file.write_all(b"#EXTM3U\n").unwrap();

        let uploaded = publisher
            .publish_file(file.path(), "hls/clip/master.m3u8")
            .await;

        assert!(uploaded);
        assert_eq!(
            store.get("hls/clip/master.m3u8").unwrap(),
            b"#EXTM3U\n".to_vec()
        );
    }

    #[tokio::test]
    async fn if_absent_skips_existing_objects() {
        let (publisher, store) = publisher_with_store();

        assert!(publisher.publish_text_if_absent("myFilms/a/placeholder.txt", "").await);
        assert!(!publisher.publish_text_if_absent("myFilms/a/placeholder.txt", "x").await);

        assert_eq!(store.get("myFilms/a/placeholder.txt").unwrap(), b"".to_vec());
    }
}
