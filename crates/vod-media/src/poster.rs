//! Poster frame extraction.

use std::path::Path;

use tracing::info;

use crate::error::{MediaError, MediaResult};
use crate::runner::MediaToolRunner;

/// Fixed capture offset into the stream.
const POSTER_TIMESTAMP: &str = "00:00:10.000";

/// Build the FFmpeg argument list for a single-frame poster capture.
pub fn poster_args(source: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        source.to_string_lossy().into_owned(),
        "-ss".to_string(),
        POSTER_TIMESTAMP.to_string(),
        "-vframes".to_string(),
        "1".to_string(),
        "-update".to_string(),
        "1".to_string(),
        "-y".to_string(),
        output.to_string_lossy().into_owned(),
    ]
}

/// Capture a poster frame, overwriting any existing output file.
pub async fn extract_poster(
    runner: &dyn MediaToolRunner,
    source: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let source = source.as_ref();
    let output = output.as_ref();

    if !source.exists() {
        return Err(MediaError::FileNotFound(source.to_path_buf()));
    }

    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let args = poster_args(source, output);
    let result = runner.run("ffmpeg", &args).await?;

    if !result.success() {
        return Err(MediaError::tool_failed(
            "ffmpeg",
            "poster extraction failed",
            Some(result.stderr_text()),
            result.exit_code,
        ));
    }

    info!("Extracted poster {} from {}", output.display(), source.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn capture_is_a_single_frame_at_ten_seconds() {
        let args = poster_args(
            &PathBuf::from("/media/videos/clip.mp4"),
            &PathBuf::from("/media/videos/posters/clip.jpg"),
        );

        let idx = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[idx + 1], "00:00:10.000");
        assert!(args.contains(&"-vframes".to_string()));
        assert!(args.contains(&"-y".to_string()));
        assert_eq!(args.last().unwrap(), "/media/videos/posters/clip.jpg");
    }
}
