//! Video record models.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Duration placeholder used until probing succeeds.
pub const DURATION_SENTINEL: &str = "00:00:00";

/// Unique identifier for a video record.
///
/// Opaque numeric id allocated by the catalog; stable for the record's
/// lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct VideoId(pub i64);

impl VideoId {
    /// Get the inner numeric id.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for VideoId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One uploaded source video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoRecord {
    /// Catalog-allocated id
    pub id: VideoId,

    /// Video title
    pub title: String,

    /// Description
    pub description: String,

    /// Category label
    #[serde(default)]
    pub category: String,

    /// Age rating (e.g. "12", "16")
    #[serde(default)]
    pub age_rating: String,

    /// Source resolution label (e.g. "HD", "4K")
    #[serde(default)]
    pub resolution: String,

    /// Release year
    #[serde(default)]
    pub release_year: String,

    /// Human-readable stream duration (`HH:MM:SS`); empty until probed
    #[serde(default)]
    pub video_duration: String,

    /// Creation date
    pub created_at: NaiveDate,

    /// Filename of the locally stored source file (under the media root)
    pub source_file: String,

    /// Public master-playlist URL; `None` until transcoding has published
    /// a master playlist, then never mutated except by deletion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hls_playlist: Option<String>,
}

impl VideoRecord {
    /// Source filename without its extension; the join key between the
    /// record and every derived object-store artifact.
    pub fn base_name(&self) -> &str {
        base_name_of(&self.source_file)
    }
}

/// Payload for creating a video record; the catalog allocates the id and
/// initializes duration and playlist fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub age_rating: String,
    #[serde(default)]
    pub resolution: String,
    #[serde(default)]
    pub release_year: String,
    pub created_at: NaiveDate,
    pub source_file: String,
}

impl NewVideo {
    /// Build the full record once the catalog has allocated an id.
    pub fn into_record(self, id: VideoId) -> VideoRecord {
        VideoRecord {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            age_rating: self.age_rating,
            resolution: self.resolution,
            release_year: self.release_year,
            video_duration: String::new(),
            created_at: self.created_at,
            source_file: self.source_file,
            hls_playlist: None,
        }
    }

    /// Source filename without its extension.
    pub fn base_name(&self) -> &str {
        base_name_of(&self.source_file)
    }
}

fn base_name_of(file_name: &str) -> &str {
    let name = file_name.rsplit('/').next().unwrap_or(file_name);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
