//! Master playlist synthesis.

use std::path::{Path, PathBuf};

use vod_models::Rendition;

use crate::error::MediaResult;

/// Render the multivariant playlist text for the given resolution labels,
/// in order.
///
/// Deterministic: the same labels always produce byte-identical text.
/// Unknown labels are rejected before anything is rendered.
pub fn render_master_playlist(labels: &[&str]) -> MediaResult<String> {
    let renditions = labels
        .iter()
        .map(|label| Rendition::parse(label))
        .collect::<Result<Vec<_>, _>>()?;

    let mut playlist = String::from("#EXTM3U\n#EXT-X-VERSION:3\n\n");

    for rendition in renditions {
        let (width, height) = rendition.dimensions();
        playlist.push_str(&format!(
            "#EXT-X-STREAM-INF:BANDWIDTH={},RESOLUTION={}x{}\n",
            rendition.bandwidth(),
            width,
            height
        ));
        playlist.push_str(&format!("{}\n\n", rendition.playlist_name()));
    }

    Ok(playlist)
}

/// Write `master.m3u8` into `output_dir`, referencing one sub-playlist per
/// label. Label validation happens before the file is touched, so an
/// unsupported label leaves no partial output behind.
pub fn write_master_playlist(output_dir: impl AsRef<Path>, labels: &[&str]) -> MediaResult<PathBuf> {
    let playlist = render_master_playlist(labels)?;
    let path = output_dir.as_ref().join("master.m3u8");
    std::fs::write(&path, playlist)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXED_LABELS: [&str; 4] = ["360", "480", "720", "1080"];

    #[test]
    fn playlist_text_is_byte_identical() {
        let expected = "\
#EXTM3U
#EXT-X-VERSION:3

#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360
360p.m3u8

#EXT-X-STREAM-INF:BANDWIDTH=1400000,RESOLUTION=854x480
480p.m3u8

#EXT-X-STREAM-INF:BANDWIDTH=2800000,RESOLUTION=1280x720
720p.m3u8

#EXT-X-STREAM-INF:BANDWIDTH=5000000,RESOLUTION=1920x1080
1080p.m3u8

";
        assert_eq!(render_master_playlist(&FIXED_LABELS).unwrap(), expected);
    }

    #[test]
    fn order_is_preserved() {
        let playlist = render_master_playlist(&["1080", "360"]).unwrap();
        let first = playlist.find("1080p.m3u8").unwrap();
        let second = playlist.find("360p.m3u8").unwrap();
        assert!(first < second);
    }

    #[test]
    fn unsupported_label_errors_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_master_playlist(dir.path(), &["360", "1440"]);
        assert!(result.is_err());
        assert!(!dir.path().join("master.m3u8").exists());
    }

    #[test]
    fn writes_master_into_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_master_playlist(dir.path(), &FIXED_LABELS).unwrap();
        assert_eq!(path, dir.path().join("master.m3u8"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, render_master_playlist(&FIXED_LABELS).unwrap());
    }
}
