//! Redis Streams job queue.
//!
//! This crate provides:
//! - Job enqueueing via Redis Streams (one job per new video record)
//! - Worker consumption with retry/DLQ
//! - Crash recovery by claiming stale pending entries
//!
//! Delivery is at-least-once: a job may reach a worker more than once, so
//! every consumer stage must be safe to replay.

pub mod error;
pub mod job;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use job::ConvertVideoJob;
pub use queue::{JobQueue, QueueConfig};
