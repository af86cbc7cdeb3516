//! The transcode job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vod_models::{JobId, VideoId};

/// Job to derive poster and HLS renditions for a newly created video.
///
/// Carries the record id and the source base name: the id drives the
/// catalog lookup, the name drives every local and remote artifact path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertVideoJob {
    /// Unique job ID
    pub job_id: JobId,
    /// Video record id
    pub video_id: VideoId,
    /// Source filename without extension
    pub video_name: String,
    /// When the job was enqueued
    pub enqueued_at: DateTime<Utc>,
}

impl ConvertVideoJob {
    /// Create a new convert job.
    pub fn new(video_id: VideoId, video_name: impl Into<String>) -> Self {
        Self {
            job_id: JobId::new(),
            video_id,
            video_name: video_name.into(),
            enqueued_at: Utc::now(),
        }
    }

    /// Generate idempotency key for deduplication.
    pub fn idempotency_key(&self) -> String {
        format!("convert:{}", self.video_id)
    }
}
