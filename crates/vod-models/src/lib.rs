//! Shared data models for the vodforge backend.
//!
//! This crate provides Serde-serializable types for:
//! - Video records and creation payloads
//! - Job identifiers
//! - The fixed rendition (bitrate/resolution) table
//! - The object-store artifact key scheme
//! - Cached listing schemas served by the library views

pub mod artifact;
pub mod job;
pub mod library;
pub mod rendition;
pub mod video;

// Re-export common types
pub use artifact::{
    film_folder_prefix, hls_prefix, master_playlist_key, placeholder_key, poster_key,
    rendition_playlist_key, segment_key, text_key, text_prefix, FILMS_ROOT, PLACEHOLDER_MARKER,
    POSTERS_PREFIX, TEXT_ROOT,
};
pub use job::JobId;
pub use library::{VideoTextEntry, SIDECAR_FIELDS};
pub use rendition::{Rendition, RenditionError};
pub use video::{NewVideo, VideoId, VideoRecord, DURATION_SENTINEL};
