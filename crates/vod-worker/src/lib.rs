//! Transcode worker.
//!
//! This crate provides:
//! - The job executor (queue consumption, retry/DLQ, graceful shutdown)
//! - The convert pipeline: probe, poster, per-rendition encode, master
//!   playlist, publish
//! - The lifecycle reconciler for record deletion
//! - The intake service (create record, publish sidecars, enqueue)

pub mod config;
pub mod error;
pub mod executor;
pub mod intake;
pub mod logging;
pub mod pipeline;
pub mod reconciler;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use intake::{ConvertEnqueuer, IntakeService};
pub use logging::JobLogger;
pub use pipeline::{ConvertOutcome, ConvertPipeline, ConvertStatus};
pub use reconciler::Reconciler;
