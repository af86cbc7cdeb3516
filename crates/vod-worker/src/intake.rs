//! The intake write path.
//!
//! Record creation runs in the request path and must never block on
//! transcoding: it commits the record, publishes the static metadata
//! sidecars, and enqueues the convert job. The enqueue happens strictly
//! after the catalog create has returned, so a worker can never pick up a
//! job whose record is not yet visible.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use vod_catalog::VideoCatalog;
use vod_models::{artifact, NewVideo, VideoId, VideoRecord, VideoTextEntry};
use vod_queue::{ConvertVideoJob, JobQueue, QueueResult};
use vod_storage::{ObjectStore, Publisher};

use crate::error::WorkerResult;
use crate::reconciler::Reconciler;

/// Static sidecar fields written at intake; duration and playlist URL are
/// refreshed by the pipeline once known.
const INTAKE_FIELDS: [&str; 6] = [
    "title",
    "description",
    "category",
    "age",
    "resolution",
    "release_date",
];

/// Capability for handing a convert job to the queue.
#[async_trait]
pub trait ConvertEnqueuer: Send + Sync {
    async fn enqueue(&self, job: ConvertVideoJob) -> QueueResult<String>;
}

#[async_trait]
impl ConvertEnqueuer for JobQueue {
    async fn enqueue(&self, job: ConvertVideoJob) -> QueueResult<String> {
        self.enqueue_convert(job).await
    }
}

/// Create/delete entry points used by the upload and admin surfaces.
pub struct IntakeService {
    catalog: Arc<dyn VideoCatalog>,
    publisher: Publisher,
    queue: Arc<dyn ConvertEnqueuer>,
    reconciler: Reconciler,
}

impl IntakeService {
    pub fn new(
        catalog: Arc<dyn VideoCatalog>,
        store: Arc<dyn ObjectStore>,
        queue: Arc<dyn ConvertEnqueuer>,
        reconciler: Reconciler,
    ) -> Self {
        Self {
            catalog,
            publisher: Publisher::new(store),
            queue,
            reconciler,
        }
    }

    /// Create a record and enqueue its transcode.
    pub async fn create_video(&self, new: NewVideo) -> WorkerResult<VideoRecord> {
        let record = self.catalog.create(new).await?;
        let name = record.base_name().to_string();

        for field in INTAKE_FIELDS {
            let value = VideoTextEntry::field_value(&record, field);
            self.publisher
                .publish_text(&artifact::text_key(&name, field), &value)
                .await;
        }

        // The record is committed and readable; only now may a worker see
        // the job.
        self.queue
            .enqueue(ConvertVideoJob::new(record.id, &name))
            .await?;

        info!(video_id = %record.id, "Enqueued video '{}' for conversion", record.title);
        Ok(record)
    }

    /// Delete a record and reconcile its artifacts. Artifact cleanup is
    /// best-effort; the record deletion always wins.
    pub async fn delete_video(&self, id: VideoId) -> WorkerResult<Option<VideoRecord>> {
        let Some(record) = self.catalog.delete(id).await? else {
            return Ok(None);
        };

        self.reconciler.cleanup(&record).await;
        Ok(Some(record))
    }
}
