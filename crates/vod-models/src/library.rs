//! Schemas for the cache-backed library views.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::video::VideoRecord;

/// Metadata sidecar fields published under `text/<name>/<field>.txt`,
/// one object per field.
pub const SIDECAR_FIELDS: [&str; 8] = [
    "title",
    "description",
    "category",
    "age",
    "resolution",
    "release_date",
    "video_duration",
    "hlsPlaylist",
];

/// One video's assembled sidecar metadata, as served by the listing view.
///
/// Fixed schema for cache storage: writer and reader share this struct, so
/// the cached shape cannot silently drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoTextEntry {
    /// Base name of the video (the `text/` subfolder)
    pub subfolder: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "hlsPlaylistUrl")]
    pub hls_playlist_url: String,
    #[serde(rename = "posterUrlGcs")]
    pub poster_url: Option<String>,
    pub age: String,
    pub resolution: String,
    pub release_date: String,
    pub video_duration: String,
}

impl VideoTextEntry {
    /// Sidecar value for a field, as the intake service publishes it.
    pub fn field_value(record: &VideoRecord, field: &str) -> String {
        match field {
            "title" => record.title.clone(),
            "description" => record.description.clone(),
            "category" => record.category.clone(),
            "age" => record.age_rating.clone(),
            "resolution" => record.resolution.clone(),
            "release_date" => record.release_year.clone(),
            "video_duration" => record.video_duration.clone(),
            "hlsPlaylist" => record.hls_playlist.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::{NewVideo, VideoId};
    use chrono::NaiveDate;

    #[test]
    fn field_values_follow_the_record() {
        let mut record = NewVideo {
            title: "T".to_string(),
            description: "D".to_string(),
            category: "C".to_string(),
            age_rating: "16".to_string(),
            resolution: "HD".to_string(),
            release_year: "2021".to_string(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            source_file: "clip.mp4".to_string(),
        }
        .into_record(VideoId(1));
        record.hls_playlist = Some("https://cdn/hls/clip/master.m3u8".to_string());

        assert_eq!(VideoTextEntry::field_value(&record, "title"), "T");
        assert_eq!(VideoTextEntry::field_value(&record, "age"), "16");
        assert_eq!(VideoTextEntry::field_value(&record, "release_date"), "2021");
        assert_eq!(
            VideoTextEntry::field_value(&record, "hlsPlaylist"),
            "https://cdn/hls/clip/master.m3u8"
        );
    }

    #[test]
    fn every_sidecar_field_has_a_value_source() {
        let record = NewVideo {
            title: "T".to_string(),
            description: "D".to_string(),
            category: String::new(),
            age_rating: String::new(),
            resolution: String::new(),
            release_year: String::new(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            source_file: "clip.mp4".to_string(),
        }
        .into_record(VideoId(2));

        for field in SIDECAR_FIELDS {
            // Must not panic for any declared field.
            let _ = VideoTextEntry::field_value(&record, field);
        }
    }
}
