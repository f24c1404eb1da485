//! Locates the FFmpeg binary used for fragment export.

use std::path::PathBuf;
use std::process::Command;

use parking_lot::Mutex;

use crate::error::AppError;

static FFMPEG_PATH_CACHE: Mutex<Option<PathBuf>> = Mutex::new(None);

#[cfg(target_os = "windows")]
fn find_in_path() -> Option<PathBuf> {
    let output = Command::new("where").arg("ffmpeg").output().ok()?;
    if output.status.success() {
        let path = String::from_utf8_lossy(&output.stdout);
        let first = path.lines().next()?.trim();
        if !first.is_empty() {
            return Some(PathBuf::from(first));
        }
    }
    None
}

#[cfg(not(target_os = "windows"))]
fn find_in_path() -> Option<PathBuf> {
    let output = Command::new("which").arg("ffmpeg").output().ok()?;
    if output.status.success() {
        let path = String::from_utf8_lossy(&output.stdout);
        let first = path.lines().next()?.trim();
        if !first.is_empty() {
            return Some(PathBuf::from(first));
        }
    }
    None
}

fn common_paths() -> Vec<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        vec![
            PathBuf::from("/opt/homebrew/bin/ffmpeg"),
            PathBuf::from("/usr/local/bin/ffmpeg"),
            PathBuf::from("/opt/local/bin/ffmpeg"),
        ]
    }

    #[cfg(target_os = "windows")]
    {
        vec![
            PathBuf::from("C:\\ffmpeg\\bin\\ffmpeg.exe"),
            PathBuf::from("C:\\Program Files\\ffmpeg\\bin\\ffmpeg.exe"),
        ]
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        vec![
            PathBuf::from("/usr/bin/ffmpeg"),
            PathBuf::from("/usr/local/bin/ffmpeg"),
        ]
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
    {
        vec![]
    }
}

fn resolve_ffmpeg_path() -> Result<PathBuf, AppError> {
    // Common paths first to avoid spawning which/where.
    for path in common_paths() {
        if path.exists() {
            log::debug!(
                target: "frag_cut::export::discovery",
                "FFmpeg found in common path: {}",
                path.display()
            );
            return Ok(path);
        }
    }

    if let Some(p) = find_in_path() {
        if p.exists() {
            log::debug!(
                target: "frag_cut::export::discovery",
                "FFmpeg found in PATH: {}",
                p.display()
            );
            return Ok(p);
        }
    }

    log::error!(
        target: "frag_cut::export::discovery",
        "FFmpeg not found in PATH or common locations"
    );
    Err(AppError::FfmpegNotFound(
        "FFmpeg not found. Please install FFmpeg on your system:\n  - macOS: brew install ffmpeg\n  - Linux: sudo apt install ffmpeg\n  - Windows: Download from https://ffmpeg.org/download.html"
            .to_string(),
    ))
}

/// Get the FFmpeg path. Cached for the process lifetime; failures are not
/// cached, so a user can install FFmpeg and retry without restarting.
///
/// The `FFMPEG_PATH` env var takes precedence and is trusted strictly: an
/// override pointing at a missing binary is an error, not a fallback.
pub fn get_ffmpeg_path() -> Result<PathBuf, AppError> {
    let mut cache = FFMPEG_PATH_CACHE.lock();
    if let Some(path) = cache.as_ref() {
        return Ok(path.clone());
    }

    let path = match std::env::var("FFMPEG_PATH") {
        Ok(env_path) => {
            let p = PathBuf::from(&env_path);
            if !p.exists() {
                return Err(AppError::FfmpegNotFound(format!(
                    "FFMPEG_PATH points to a missing binary: {}",
                    env_path
                )));
            }
            log::debug!(
                target: "frag_cut::export::discovery",
                "FFmpeg path from FFMPEG_PATH env: {}",
                p.display()
            );
            p
        }
        Err(_) => resolve_ffmpeg_path()?,
    };

    *cache = Some(path.clone());
    Ok(path)
}

/// Clears the cached path so tests can vary `FFMPEG_PATH` between cases.
#[cfg(any(test, feature = "discovery-test-helpers"))]
pub fn reset_ffmpeg_path_cache() {
    *FFMPEG_PATH_CACHE.lock() = None;
}
