//! Plain data shared between the user-facing front and the playback and
//! export layers.

use std::path::{Path, PathBuf};

/// Extensions offered by the open-file filter. Files outside this list can
/// still be loaded through the free-text path field.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "wmv", "webm", "m4v"];

/// True when the path carries one of the common video extensions.
pub fn is_video_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Normalizes a pasted or typed path: trims whitespace and strips surrounding
/// double quotes (shells and file managers add them when copying paths).
/// Returns `None` when nothing is left.
pub fn normalize_path_input(raw: &str) -> Option<PathBuf> {
    let cleaned = raw.trim().trim_matches('"');
    if cleaned.is_empty() {
        None
    } else {
        Some(PathBuf::from(cleaned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_match_case_insensitively() {
        assert!(is_video_extension(Path::new("clip.mp4")));
        assert!(is_video_extension(Path::new("CLIP.MKV")));
        assert!(is_video_extension(Path::new("/tmp/a.b/movie.WebM")));
    }

    #[test]
    fn other_extensions_do_not_match() {
        assert!(!is_video_extension(Path::new("notes.txt")));
        assert!(!is_video_extension(Path::new("noext")));
    }

    #[test]
    fn quoted_and_padded_paths_are_cleaned() {
        assert_eq!(
            normalize_path_input("  \"/videos/clip.mp4\"  "),
            Some(PathBuf::from("/videos/clip.mp4"))
        );
        assert_eq!(
            normalize_path_input("/videos/clip.mp4"),
            Some(PathBuf::from("/videos/clip.mp4"))
        );
    }

    #[test]
    fn empty_input_is_none() {
        assert_eq!(normalize_path_input("   "), None);
        assert_eq!(normalize_path_input("\"\""), None);
    }
}
