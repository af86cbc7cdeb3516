//! External media-tool orchestration.
//!
//! This crate provides:
//! - The `MediaToolRunner` capability and its process-spawning implementation
//! - Container duration probing via FFprobe
//! - Per-rendition HLS transcoding via FFmpeg
//! - Poster frame extraction
//! - Master playlist synthesis

pub mod error;
pub mod playlist;
pub mod poster;
pub mod probe;
pub mod runner;
pub mod transcode;

pub use error::{MediaError, MediaResult};
pub use playlist::{render_master_playlist, write_master_playlist};
pub use poster::extract_poster;
pub use probe::{format_duration, probe_duration, probe_duration_or_default};
pub use runner::{MediaToolRunner, SystemToolRunner, ToolOutput};
pub use transcode::transcode_rendition;
