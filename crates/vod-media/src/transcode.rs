//! Per-rendition HLS transcoding.

use std::path::Path;

use tracing::{debug, info};

use vod_models::Rendition;

use crate::error::{MediaError, MediaResult};
use crate::runner::MediaToolRunner;

/// HLS segment target duration in seconds.
const HLS_SEGMENT_SECONDS: &str = "4";

/// Build the FFmpeg argument list for one rendition.
///
/// The audio/video template is shared across renditions; only the scale
/// filter, the target bitrate, and the output names vary.
pub fn rendition_args(source: &Path, output_dir: &Path, rendition: Rendition) -> Vec<String> {
    let segment_template = output_dir.join(format!("{}p_%03d.ts", rendition.label()));
    let playlist = output_dir.join(rendition.playlist_name());

    let mut args: Vec<String> = vec![
        "-i".to_string(),
        source.to_string_lossy().into_owned(),
    ];
    args.extend(
        [
            "-c:a",
            "aac",
            "-ar",
            "48000",
            "-b:a",
            "128k",
            "-c:v",
            "h264",
            "-profile:v",
            "main",
            "-crf",
            "20",
            "-sc_threshold",
            "0",
            "-g",
            "48",
            "-keyint_min",
            "48",
            "-hls_time",
            HLS_SEGMENT_SECONDS,
            "-hls_playlist_type",
            "vod",
        ]
        .into_iter()
        .map(String::from),
    );

    args.push("-vf".to_string());
    args.push(format!("scale=-2:{}", rendition.height()));
    args.push("-b:v".to_string());
    args.push(rendition.video_bitrate().to_string());
    args.push("-hls_segment_filename".to_string());
    args.push(segment_template.to_string_lossy().into_owned());
    args.push(playlist.to_string_lossy().into_owned());

    args
}

/// Transcode the source into one rendition's segments and sub-playlist.
///
/// A non-zero encoder exit aborts this rendition only; the caller decides
/// whether to keep going with the remaining renditions.
pub async fn transcode_rendition(
    runner: &dyn MediaToolRunner,
    source: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    rendition: Rendition,
) -> MediaResult<()> {
    let source = source.as_ref();
    let output_dir = output_dir.as_ref();

    if !source.exists() {
        return Err(MediaError::FileNotFound(source.to_path_buf()));
    }

    let args = rendition_args(source, output_dir, rendition);
    debug!(rendition = %rendition, "Running encoder for {}", source.display());

    let output = runner.run("ffmpeg", &args).await?;

    if !output.success() {
        return Err(MediaError::tool_failed(
            "ffmpeg",
            format!("encode to {} failed", rendition),
            Some(output.stderr_text()),
            output.exit_code,
        ));
    }

    info!(rendition = %rendition, "Encoded {} into {}", source.display(), output_dir.display());
    Ok(())
}
