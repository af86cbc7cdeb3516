//! The object-store capability.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::error::StorageResult;

/// Capability for a durable object store addressed by string keys.
///
/// Implementations: `S3ObjectStore` in production, `MemoryObjectStore` in
/// tests. Components hold `Arc<dyn ObjectStore>` so fakes can be injected.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file to `key`.
    async fn upload_file(&self, path: &Path, key: &str, content_type: &str) -> StorageResult<()>;

    /// Upload raw bytes to `key`.
    async fn upload_bytes(&self, data: Vec<u8>, key: &str, content_type: &str)
        -> StorageResult<()>;

    /// Download the object at `key`.
    async fn download_bytes(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// List all keys under `prefix` (paginating as needed).
    async fn list_keys(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Delete the object at `key`.
    async fn delete_key(&self, key: &str) -> StorageResult<()>;

    /// Whether an object exists at `key`.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Externally reachable URL for `key`.
    fn public_url(&self, key: &str) -> String;
}

/// Download the object at `key` as UTF-8 text.
pub async fn download_text(store: &dyn ObjectStore, key: &str) -> StorageResult<String> {
    let bytes = store.download_bytes(key).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Delete every object under `prefix`. Returns the number of deleted keys.
pub async fn delete_prefix(store: &dyn ObjectStore, prefix: &str) -> StorageResult<u32> {
    let keys = store.list_keys(prefix).await?;
    let mut deleted = 0u32;

    for key in &keys {
        store.delete_key(key).await?;
        deleted += 1;
    }

    if deleted > 0 {
        info!("Deleted {} objects under {}", deleted, prefix);
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryObjectStore;

    #[tokio::test]
    async fn delete_prefix_removes_only_matching_keys() {
        let store = MemoryObjectStore::new("https://cdn.example.com");
        store
            .upload_bytes(b"a".to_vec(), "hls/clip/360p.m3u8", "text/plain")
            .await
            .unwrap();
        store
            .upload_bytes(b"b".to_vec(), "hls/clip/360p_000.ts", "video/mp2t")
            .await
            .unwrap();
        store
            .upload_bytes(b"c".to_vec(), "hls/other/360p.m3u8", "text/plain")
            .await
            .unwrap();

        let deleted = delete_prefix(&store, "hls/clip/").await.unwrap();
        assert_eq!(deleted, 2);
        assert!(store.list_keys("hls/clip/").await.unwrap().is_empty());
        assert_eq!(store.list_keys("hls/other/").await.unwrap().len(), 1);
    }
}
