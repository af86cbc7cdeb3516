//! Object-store key scheme.
//!
//! Remote paths are derived deterministically from a video's base name;
//! this naming convention is the only join between the catalog record and
//! the object store, so every producer and consumer goes through these
//! functions.

use crate::rendition::Rendition;

/// Root prefix for poster images.
pub const POSTERS_PREFIX: &str = "video-posters/";

/// Root prefix for metadata sidecar files.
pub const TEXT_ROOT: &str = "text/";

/// Root prefix for user film folders.
pub const FILMS_ROOT: &str = "myFilms/";

/// Marker object that makes an otherwise-empty folder listable.
pub const PLACEHOLDER_MARKER: &str = "placeholder.txt";

/// `hls/<name>/`, the folder holding everything the transcode produced.
pub fn hls_prefix(name: &str) -> String {
    format!("hls/{}/", name)
}

/// `hls/<name>/master.m3u8`
pub fn master_playlist_key(name: &str) -> String {
    format!("hls/{}/master.m3u8", name)
}

/// `hls/<name>/<res>p.m3u8`
pub fn rendition_playlist_key(name: &str, rendition: Rendition) -> String {
    format!("hls/{}/{}", name, rendition.playlist_name())
}

/// `hls/<name>/<segment filename>`
pub fn segment_key(name: &str, segment_file_name: &str) -> String {
    format!("hls/{}/{}", name, segment_file_name)
}

/// `video-posters/<name>.jpg`
pub fn poster_key(name: &str) -> String {
    format!("{}{}.jpg", POSTERS_PREFIX, name)
}

/// `text/<name>/`
pub fn text_prefix(name: &str) -> String {
    format!("{}{}/", TEXT_ROOT, name)
}

/// `text/<name>/<field>.txt`
pub fn text_key(name: &str, field: &str) -> String {
    format!("{}{}/{}.txt", TEXT_ROOT, name, field)
}

/// `myFilms/<name>/`
pub fn film_folder_prefix(name: &str) -> String {
    format!("{}{}/", FILMS_ROOT, name)
}

/// `myFilms/<name>/placeholder.txt`
pub fn placeholder_key(name: &str) -> String {
    format!("{}{}/{}", FILMS_ROOT, name, PLACEHOLDER_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_derived_from_base_name() {
        assert_eq!(hls_prefix("clip"), "hls/clip/");
        assert_eq!(master_playlist_key("clip"), "hls/clip/master.m3u8");
        assert_eq!(
            rendition_playlist_key("clip", Rendition::R720),
            "hls/clip/720p.m3u8"
        );
        assert_eq!(segment_key("clip", "720p_003.ts"), "hls/clip/720p_003.ts");
        assert_eq!(poster_key("clip"), "video-posters/clip.jpg");
        assert_eq!(text_key("clip", "title"), "text/clip/title.txt");
        assert_eq!(text_prefix("clip"), "text/clip/");
        assert_eq!(film_folder_prefix("clip"), "myFilms/clip/");
        assert_eq!(placeholder_key("clip"), "myFilms/clip/placeholder.txt");
    }
}
