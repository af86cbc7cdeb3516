//! Cache-backed read views.
//!
//! Listings and lookups that the HTTP layer reshapes into JSON: poster
//! URLs, assembled sidecar metadata, direct playback URLs, and user film
//! folders. Every view reads through the cache with a fixed TTL; the
//! object store stays authoritative, so a cache flush only costs a
//! recomputation.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use vod_cache::{get_or_compute, ByteCache, DEFAULT_TTL_SECS};
use vod_models::{
    artifact, VideoTextEntry, FILMS_ROOT, PLACEHOLDER_MARKER, POSTERS_PREFIX, TEXT_ROOT,
};
use vod_storage::{download_text, ObjectStore, Publisher, StorageResult};

/// Cache key for the poster URL listing.
pub const POSTER_URLS_KEY: &str = "poster_urls";

/// Cache key for the assembled sidecar metadata listing.
pub const VIDEO_TEXT_KEY: &str = "gcs_video_text_data";

/// Cache key for the film folder listing.
pub const MY_FILMS_KEY: &str = "my_films_subfolders";

/// Read views over the object store, served through the cache.
pub struct Library {
    store: Arc<dyn ObjectStore>,
    cache: Arc<dyn ByteCache>,
    publisher: Publisher,
}

impl Library {
    pub fn new(store: Arc<dyn ObjectStore>, cache: Arc<dyn ByteCache>) -> Self {
        let publisher = Publisher::new(store.clone());
        Self {
            store,
            cache,
            publisher,
        }
    }

    /// Public URLs of every published poster.
    pub async fn poster_urls(&self) -> StorageResult<Vec<String>> {
        get_or_compute(
            self.cache.as_ref(),
            POSTER_URLS_KEY,
            DEFAULT_TTL_SECS,
            || async {
                let keys = self.store.list_keys(POSTERS_PREFIX).await?;
                Ok(keys.iter().map(|k| self.store.public_url(k)).collect())
            },
        )
        .await
    }

    /// Assembled sidecar metadata for every video with a published
    /// `description.txt`, poster URLs matched in by base name.
    pub async fn video_text_listing(&self) -> StorageResult<Vec<VideoTextEntry>> {
        let poster_urls = self.poster_urls().await?;

        get_or_compute(
            self.cache.as_ref(),
            VIDEO_TEXT_KEY,
            DEFAULT_TTL_SECS,
            || async {
                let keys = self.store.list_keys(TEXT_ROOT).await?;
                let mut entries = Vec::new();

                for key in keys {
                    if !key.ends_with("/description.txt") {
                        continue;
                    }
                    let Some(subfolder) = key.split('/').nth(1).map(str::to_string) else {
                        continue;
                    };
                    entries.push(self.assemble_entry(&subfolder, &poster_urls).await?);
                }

                Ok(entries)
            },
        )
        .await
    }

    /// Direct playback URL for one rendition, keyed by
    /// `<video_key>_<resolution>`.
    pub async fn playback_url(&self, video_key: &str, resolution: &str) -> StorageResult<String> {
        let cache_key = format!("{}_{}", video_key, resolution);
        let url = self
            .store
            .public_url(&format!("hls/{}/{}.m3u8", video_key, resolution));

        get_or_compute(
            self.cache.as_ref(),
            &cache_key,
            DEFAULT_TTL_SECS,
            || async move {
                debug!("Generated playback URL: {}", url);
                Ok(url)
            },
        )
        .await
    }

    /// Names of the user film folders under `myFilms/`.
    pub async fn my_films(&self) -> StorageResult<Vec<String>> {
        get_or_compute(
            self.cache.as_ref(),
            MY_FILMS_KEY,
            DEFAULT_TTL_SECS,
            || async {
                let keys = self.store.list_keys(FILMS_ROOT).await?;
                let names: BTreeSet<String> = keys
                    .iter()
                    .filter(|k| k.ends_with(PLACEHOLDER_MARKER))
                    .filter_map(|k| k.split('/').nth(1))
                    .map(str::to_string)
                    .collect();
                Ok(names.into_iter().collect())
            },
        )
        .await
    }

    /// Create a film folder by writing its placeholder marker, skipping the
    /// upload when the folder already exists. Returns the folder URL.
    pub async fn create_film_folder(&self, name: &str) -> StorageResult<String> {
        self.publisher
            .publish_text_if_absent(&artifact::placeholder_key(name), "")
            .await;
        Ok(self.store.public_url(&artifact::film_folder_prefix(name)))
    }

    async fn assemble_entry(
        &self,
        subfolder: &str,
        poster_urls: &[String],
    ) -> StorageResult<VideoTextEntry> {
        let field = |name: &str| artifact::text_key(subfolder, name);

        let description = self.text_or(&field("description"), "").await;
        let title = self.text_or(&field("title"), "").await;
        let category = self.text_or(&field("category"), "").await;
        let hls_playlist_url = self.text_or(&field("hlsPlaylist"), "").await;
        let age = self.text_or(&field("age"), "0").await;
        let resolution = self.text_or(&field("resolution"), "HD").await;
        let release_date = self.text_or(&field("release_date"), "2020").await;
        let video_duration = self.text_or(&field("video_duration"), "00:00:00").await;

        let poster_url = poster_urls
            .iter()
            .find(|url| url.contains(subfolder))
            .cloned();

        Ok(VideoTextEntry {
            subfolder: subfolder.to_string(),
            title,
            description,
            category,
            hls_playlist_url,
            poster_url,
            age,
            resolution,
            release_date,
            video_duration,
        })
    }

    async fn text_or(&self, key: &str, default: &str) -> String {
        match download_text(self.store.as_ref(), key).await {
            Ok(text) => text.trim().to_string(),
            Err(_) => default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vod_cache::MemoryCache;
    use vod_storage::MemoryObjectStore;

    const BASE: &str = "https://cdn.example.com";

    fn library() -> (Library, Arc<MemoryObjectStore>, Arc<MemoryCache>) {
        let store = Arc::new(MemoryObjectStore::new(BASE));
        let cache = Arc::new(MemoryCache::new());
        (
            Library::new(store.clone(), cache.clone()),
            store,
            cache,
        )
    }

    async fn put(store: &MemoryObjectStore, key: &str, value: &str) {
        store
            .upload_bytes(value.as_bytes().to_vec(), key, "text/plain")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn poster_urls_lists_published_posters() {
        let (library, store, _) = library();
        put(&store, "video-posters/clip.jpg", "jpg").await;
        put(&store, "video-posters/other.jpg", "jpg").await;
        put(&store, "hls/clip/master.m3u8", "#EXTM3U").await;

        let urls = library.poster_urls().await.unwrap();
        assert_eq!(
            urls,
            vec![
                format!("{}/video-posters/clip.jpg", BASE),
                format!("{}/video-posters/other.jpg", BASE),
            ]
        );
    }

    #[tokio::test]
    async fn poster_urls_are_served_from_cache() {
        let (library, store, _) = library();
        put(&store, "video-posters/clip.jpg", "jpg").await;

        let first = library.poster_urls().await.unwrap();

        // A new poster is invisible until the cached listing expires.
        put(&store, "video-posters/late.jpg", "jpg").await;
        let second = library.poster_urls().await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn text_listing_assembles_sidecars_with_defaults() {
        let (library, store, _) = library();
        put(&store, "text/clip/description.txt", "A film about tests").await;
        put(&store, "text/clip/title.txt", "Clip").await;
        put(&store, "text/clip/category.txt", "Drama").await;
        put(&store, "video-posters/clip.jpg", "jpg").await;

        let entries = library.video_text_listing().await.unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.subfolder, "clip");
        assert_eq!(entry.title, "Clip");
        assert_eq!(entry.description, "A film about tests");
        assert_eq!(entry.category, "Drama");
        // Missing sidecars fall back to their fixed defaults.
        assert_eq!(entry.age, "0");
        assert_eq!(entry.resolution, "HD");
        assert_eq!(entry.release_date, "2020");
        assert_eq!(entry.video_duration, "00:00:00");
        assert_eq!(
            entry.poster_url.as_deref(),
            Some("https://cdn.example.com/video-posters/clip.jpg")
        );
    }

    #[tokio::test]
    async fn videos_without_description_are_not_listed() {
        let (library, store, _) = library();
        put(&store, "text/clip/title.txt", "Clip").await;

        let entries = library.video_text_listing().await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn playback_url_is_derived_and_cached() {
        let (library, _, cache) = library();

        let url = library.playback_url("clip", "720p").await.unwrap();
        assert_eq!(url, format!("{}/hls/clip/720p.m3u8", BASE));

        // Cached under the documented key shape.
        assert!(cache.get("clip_720p").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn my_films_collects_folder_names() {
        let (library, store, _) = library();
        put(&store, "myFilms/alpha/placeholder.txt", "").await;
        put(&store, "myFilms/beta/placeholder.txt", "").await;
        put(&store, "myFilms/beta/extra.bin", "x").await;

        let names = library.my_films().await.unwrap();
        assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[tokio::test]
    async fn create_film_folder_is_idempotent() {
        let (library, store, _) = library();

        let url = library.create_film_folder("alpha").await.unwrap();
        assert_eq!(url, format!("{}/myFilms/alpha/", BASE));
        assert!(store.get("myFilms/alpha/placeholder.txt").is_some());

        // Second call leaves the existing marker untouched.
        library.create_film_folder("alpha").await.unwrap();
        assert_eq!(store.list_keys("myFilms/alpha/").await.unwrap().len(), 1);
    }
}
