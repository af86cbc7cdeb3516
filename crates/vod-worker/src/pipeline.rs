//! The convert pipeline.
//!
//! One job turns one uploaded source into a poster, four HLS renditions,
//! and a published master playlist. Delivery is at-least-once, so every
//! stage is replay-safe: local writes overwrite, uploads overwrite, the
//! working directory creation is idempotent.

use std::path::PathBuf;
use std::sync::Arc;

use metrics::counter;

use vod_catalog::{CatalogError, VideoCatalog};
use vod_media::runner::MediaToolRunner;
use vod_media::{extract_poster, probe_duration_or_default, transcode_rendition, write_master_playlist};
use vod_models::{artifact, Rendition, VideoId, VideoRecord};
use vod_queue::ConvertVideoJob;
use vod_storage::{ObjectStore, Publisher};

use crate::error::WorkerResult;
use crate::logging::JobLogger;

/// What a finished job produced.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub video_id: VideoId,
    /// Probed duration, `00:00:00` if probing failed
    pub duration: String,
    /// Whether a poster was extracted and uploaded
    pub poster_published: bool,
    /// Renditions whose encode succeeded
    pub renditions_encoded: Vec<Rendition>,
    /// Whether the master playlist reached the object store
    pub master_published: bool,
}

/// Terminal result of a job run.
#[derive(Debug, Clone)]
pub enum ConvertStatus {
    Completed(ConvertOutcome),
    /// The referenced record does not exist; retrying can never succeed.
    AbortedMissingRecord,
}

/// The job handler: sequences probing, poster extraction, per-rendition
/// transcoding, playlist synthesis, and publishing.
pub struct ConvertPipeline {
    catalog: Arc<dyn VideoCatalog>,
    store: Arc<dyn ObjectStore>,
    publisher: Publisher,
    runner: Arc<dyn MediaToolRunner>,
    media_root: PathBuf,
}

impl ConvertPipeline {
    pub fn new(
        catalog: Arc<dyn VideoCatalog>,
        store: Arc<dyn ObjectStore>,
        runner: Arc<dyn MediaToolRunner>,
        media_root: impl Into<PathBuf>,
    ) -> Self {
        let publisher = Publisher::new(store.clone());
        Self {
            catalog,
            store,
            publisher,
            runner,
            media_root: media_root.into(),
        }
    }

    /// Run one job to completion.
    ///
    /// Only infrastructure failures (catalog/queue transport, local IO)
    /// return `Err` and reach the retry machinery; stage failures degrade
    /// per the error taxonomy and the job still completes.
    pub async fn run(&self, job: &ConvertVideoJob) -> WorkerResult<ConvertStatus> {
        let log = JobLogger::new(&job.job_id, "convert_video");
        log.log_start(&format!("converting video {}", job.video_id));

        // Fatal-to-job: a record that does not exist will never appear.
        let Some(record) = self.catalog.get(job.video_id).await? else {
            log.log_warning(&format!(
                "video {} not found in catalog, aborting without retry",
                job.video_id
            ));
            counter!("vod_jobs_aborted_total").increment(1);
            return Ok(ConvertStatus::AbortedMissingRecord);
        };

        let name = if job.video_name.is_empty() {
            record.base_name().to_string()
        } else {
            job.video_name.clone()
        };

        let source = self.source_path(&record);
        let work_dir = self.media_root.join("videos").join(&name);

        // Duration: sentinel on failure, pipeline continues.
        let duration = probe_duration_or_default(self.runner.as_ref(), &source).await;
        self.persist_duration(job.video_id, &duration, &log).await?;
        self.publisher
            .publish_text(&artifact::text_key(&name, "video_duration"), &duration)
            .await;

        // Working directory; safe if it already exists.
        tokio::fs::create_dir_all(&work_dir).await?;

        let poster_published = self.poster_stage(&name, &source, &log).await;

        let mut renditions_encoded = Vec::new();
        for rendition in Rendition::ALL {
            log.log_progress(&format!("encoding {}", rendition));
            match transcode_rendition(self.runner.as_ref(), &source, &work_dir, rendition).await {
                Ok(()) => renditions_encoded.push(rendition),
                Err(e) => {
                    // One failed encode must not cost the remaining renditions.
                    log.log_error(&format!("encode to {} failed: {}", rendition, e));
                    counter!("vod_renditions_failed_total").increment(1);
                }
            }
        }

        // The master references the full fixed list regardless of which
        // encodes succeeded; the published set stays stable across replays.
        let labels: Vec<&str> = Rendition::ALL.iter().map(|r| r.label()).collect();
        let master_path = write_master_playlist(&work_dir, &labels)?;

        let master_published = self
            .publisher
            .publish_file(&master_path, &artifact::master_playlist_key(&name))
            .await;

        for rendition in Rendition::ALL {
            let playlist = work_dir.join(rendition.playlist_name());
            self.publisher
                .publish_file(&playlist, &artifact::rendition_playlist_key(&name, rendition))
                .await;

            for segment in segment_files(&work_dir, rendition).await? {
                let file_name = segment
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.publisher
                    .publish_file(&segment, &artifact::segment_key(&name, &file_name))
                    .await;
            }
        }

        if master_published {
            let url = self.store.public_url(&artifact::master_playlist_key(&name));
            self.persist_playlist_url(job.video_id, &url, &log).await?;
            self.publisher
                .publish_text(&artifact::text_key(&name, "hlsPlaylist"), &url)
                .await;
        }

        counter!("vod_jobs_completed_total").increment(1);
        log.log_completion(&format!(
            "video {}: {}/{} renditions, poster={}, master={}",
            job.video_id,
            renditions_encoded.len(),
            Rendition::ALL.len(),
            poster_published,
            master_published
        ));

        Ok(ConvertStatus::Completed(ConvertOutcome {
            video_id: job.video_id,
            duration,
            poster_published,
            renditions_encoded,
            master_published,
        }))
    }

    fn source_path(&self, record: &VideoRecord) -> PathBuf {
        self.media_root.join("videos").join(&record.source_file)
    }

    async fn poster_stage(&self, name: &str, source: &PathBuf, log: &JobLogger) -> bool {
        let poster_path = self
            .media_root
            .join("videos")
            .join("posters")
            .join(format!("{}.jpg", name));

        match extract_poster(self.runner.as_ref(), source, &poster_path).await {
            Ok(()) => {
                self.publisher
                    .publish_file(&poster_path, &artifact::poster_key(name))
                    .await
            }
            Err(e) => {
                log.log_warning(&format!("poster extraction failed: {}", e));
                false
            }
        }
    }

    async fn persist_duration(
        &self,
        id: VideoId,
        duration: &str,
        log: &JobLogger,
    ) -> WorkerResult<()> {
        match self.catalog.set_duration(id, duration).await {
            Ok(()) => Ok(()),
            Err(CatalogError::NotFound(_)) => {
                // Record deleted while the job was in flight; the
                // reconciler owns cleanup, nothing left to persist to.
                log.log_warning("record vanished while persisting duration");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn persist_playlist_url(
        &self,
        id: VideoId,
        url: &str,
        log: &JobLogger,
    ) -> WorkerResult<()> {
        match self.catalog.set_playlist_url(id, url).await {
            Ok(()) => Ok(()),
            Err(CatalogError::NotFound(_)) => {
                log.log_warning("record vanished while persisting playlist URL");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Segment files for one rendition in the working directory, sorted by
/// name so the upload order is stable.
async fn segment_files(work_dir: &PathBuf, rendition: Rendition) -> std::io::Result<Vec<PathBuf>> {
    let prefix = rendition.segment_prefix();
    let mut segments = Vec::new();

    let mut entries = match tokio::fs::read_dir(work_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(segments),
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with(&prefix) && file_name.ends_with(".ts") {
            segments.push(entry.path());
        }
    }

    segments.sort();
    Ok(segments)
}
