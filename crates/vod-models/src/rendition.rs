//! The fixed rendition table.
//!
//! Every HLS variant this pipeline produces comes from this table; the
//! bandwidth/resolution values are part of the published master playlist and
//! must not drift.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error for resolution labels outside the fixed table.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported resolution: {0}")]
pub struct RenditionError(pub String);

/// One target output variant of a source video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Rendition {
    R360,
    R480,
    R720,
    R1080,
}

impl Rendition {
    /// Fixed transcode order.
    pub const ALL: [Rendition; 4] = [
        Rendition::R360,
        Rendition::R480,
        Rendition::R720,
        Rendition::R1080,
    ];

    /// Resolution label as used in filenames and playlists ("360", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Rendition::R360 => "360",
            Rendition::R480 => "480",
            Rendition::R720 => "720",
            Rendition::R1080 => "1080",
        }
    }

    /// Peak bandwidth in bits per second, as advertised in the master
    /// playlist.
    pub fn bandwidth(&self) -> u32 {
        match self {
            Rendition::R360 => 800_000,
            Rendition::R480 => 1_400_000,
            Rendition::R720 => 2_800_000,
            Rendition::R1080 => 5_000_000,
        }
    }

    /// Output frame size (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Rendition::R360 => (640, 360),
            Rendition::R480 => (854, 480),
            Rendition::R720 => (1280, 720),
            Rendition::R1080 => (1920, 1080),
        }
    }

    /// Target video bitrate for the encoder ("800k", ...).
    pub fn video_bitrate(&self) -> &'static str {
        match self {
            Rendition::R360 => "800k",
            Rendition::R480 => "1400k",
            Rendition::R720 => "2800k",
            Rendition::R1080 => "5000k",
        }
    }

    /// Output height, used for the encoder scale filter.
    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// Sub-playlist filename ("360p.m3u8").
    pub fn playlist_name(&self) -> String {
        format!("{}p.m3u8", self.label())
    }

    /// Segment filename prefix ("360p_").
    pub fn segment_prefix(&self) -> String {
        format!("{}p_", self.label())
    }

    /// Parse a resolution label. Labels outside the fixed table are an
    /// error, never a default.
    pub fn parse(label: &str) -> Result<Self, RenditionError> {
        match label {
            "360" => Ok(Rendition::R360),
            "480" => Ok(Rendition::R480),
            "720" => Ok(Rendition::R720),
            "1080" => Ok(Rendition::R1080),
            other => Err(RenditionError(other.to_string())),
        }
    }
}

impl fmt::Display for Rendition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.label())
    }
}

impl std::str::FromStr for Rendition {
    type Err = RenditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rendition::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_published_values() {
        assert_eq!(Rendition::R360.bandwidth(), 800_000);
        assert_eq!(Rendition::R480.bandwidth(), 1_400_000);
        assert_eq!(Rendition::R720.bandwidth(), 2_800_000);
        assert_eq!(Rendition::R1080.bandwidth(), 5_000_000);

        assert_eq!(Rendition::R360.dimensions(), (640, 360));
        assert_eq!(Rendition::R480.dimensions(), (854, 480));
        assert_eq!(Rendition::R720.dimensions(), (1280, 720));
        assert_eq!(Rendition::R1080.dimensions(), (1920, 1080));

        assert_eq!(Rendition::R1080.video_bitrate(), "5000k");
    }

    #[test]
    fn parse_rejects_unknown_labels() {
        assert_eq!(Rendition::parse("720"), Ok(Rendition::R720));
        assert!(Rendition::parse("1440").is_err());
        assert!(Rendition::parse("720p").is_err());
        assert!(Rendition::parse("").is_err());
    }

    #[test]
    fn fixed_order() {
        let labels: Vec<_> = Rendition::ALL.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["360", "480", "720", "1080"]);
    }

    #[test]
    fn filenames() {
        assert_eq!(Rendition::R480.playlist_name(), "480p.m3u8");
        assert_eq!(Rendition::R480.segment_prefix(), "480p_");
    }
}
