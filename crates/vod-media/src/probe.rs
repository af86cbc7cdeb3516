//! Container duration probing via FFprobe.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::{MediaError, MediaResult};
use crate::runner::MediaToolRunner;

use vod_models::DURATION_SENTINEL;

/// FFprobe JSON output for `-show_entries format=duration`.
#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Format a second count as zero-padded `HH:MM:SS` (hour count unbounded).
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Probe a source file's container duration and format it as `HH:MM:SS`.
pub async fn probe_duration(
    runner: &dyn MediaToolRunner,
    path: impl AsRef<Path>,
) -> MediaResult<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    let args = vec![
        "-v".to_string(),
        "error".to_string(),
        "-show_entries".to_string(),
        "format=duration".to_string(),
        "-of".to_string(),
        "json".to_string(),
        path.to_string_lossy().into_owned(),
    ];

    let output = runner.run("ffprobe", &args).await?;

    if !output.success() {
        return Err(MediaError::tool_failed(
            "ffprobe",
            "non-zero exit while probing duration",
            Some(output.stderr_text()),
            output.exit_code,
        ));
    }

    let probe: ProbeOutput = serde_json::from_slice(&output.stdout)?;

    let seconds = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.trim().parse::<f64>().ok())
        .ok_or(MediaError::MissingDuration)?;

    Ok(format_duration(seconds as u64))
}

/// Probe a source file's duration, falling back to the `00:00:00` sentinel.
///
/// Any probe failure is logged and absorbed so the pipeline can continue
/// without a duration rather than abort.
pub async fn probe_duration_or_default(
    runner: &dyn MediaToolRunner,
    path: impl AsRef<Path>,
) -> String {
    let path = path.as_ref();
    match probe_duration(runner, path).await {
        Ok(duration) => duration,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Duration probe failed, using sentinel");
            DURATION_SENTINEL.to_string()
        }
    }
}
