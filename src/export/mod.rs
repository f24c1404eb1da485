//! Lossless fragment export through the external FFmpeg binary.
//!
//! The cut is a stream copy: `-ss`/`-to` input trimming with `-c copy`, so
//! it snaps to the nearest keyframe and never re-encodes. Output lands in a
//! fixed subdirectory beside the source, named after the source stem and the
//! two fragment timestamps.

pub mod discovery;
mod error;
mod progress;
mod runner;

pub use discovery::get_ffmpeg_path;
pub use error::{FfmpegErrorPayload, parse_ffmpeg_error};
pub use runner::run_ffmpeg_blocking;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;

use crate::error::AppError;
use crate::timefmt::format_timestamp_for_file;

/// Subdirectory created beside the source file for exported fragments.
pub const OUTPUT_DIR_NAME: &str = "fragcut_out";

/// One fragment export job, validated again by [`export_fragment`] rather
/// than trusted from the caller.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub source: PathBuf,
    pub start_ms: u64,
    pub end_ms: u64,
}

pub type ExportOutcome = Result<PathBuf, AppError>;

/// Output path for a fragment: `<dir>/<stem>_<start>_<end>[.<ext>]` with the
/// timestamps in filesystem-safe `HH-MM-SS` form and the source extension
/// preserved. Deterministic, so re-exporting the same fragment overwrites.
pub fn fragment_output_path(source: &Path, start_ms: u64, end_ms: u64) -> PathBuf {
    let dir = source
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
        .join(OUTPUT_DIR_NAME);
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("fragment");
    let mut name = format!(
        "{}_{}_{}",
        stem,
        format_timestamp_for_file(start_ms),
        format_timestamp_for_file(end_ms)
    );
    if let Some(ext) = source.extension().and_then(|s| s.to_str()) {
        name.push('.');
        name.push_str(ext);
    }
    dir.join(name)
}

/// Builds the stream-copy trim invocation. `-ss`/`-to` precede `-i` so the
/// demuxer seeks instead of decoding up to the in-point; seconds carry three
/// decimal places.
pub fn build_cut_args(source: &Path, output: &Path, start_ms: u64, end_ms: u64) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-ss".to_string(),
        format!("{:.3}", start_ms as f64 / 1000.0),
        "-to".to_string(),
        format!("{:.3}", end_ms as f64 / 1000.0),
        "-i".to_string(),
        source.to_string_lossy().to_string(),
        "-c".to_string(),
        "copy".to_string(),
        "-progress".to_string(),
        "pipe:1".to_string(),
        output.to_string_lossy().to_string(),
    ]
}

/// Exports the fragment and returns the output path. Blocking; run it on a
/// worker thread via [`spawn_export`] so the tick loop stays live. The
/// output write is not atomic: a crash mid-export can leave a partial file
/// at the final name.
pub fn export_fragment(request: &ExportRequest) -> ExportOutcome {
    if !request.source.is_file() {
        return Err(AppError::file_not_found(
            request.source.display().to_string(),
        ));
    }
    if request.end_ms <= request.start_ms {
        return Err(AppError::InvalidSelection);
    }

    let output = fragment_output_path(&request.source, request.start_ms, request.end_ms);
    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)?;
    }

    log::info!(
        target: "frag_cut::export",
        "exporting {} [{} - {}] -> {}",
        request.source.display(),
        request.start_ms,
        request.end_ms,
        output.display()
    );

    let args = build_cut_args(&request.source, &output, request.start_ms, request.end_ms);
    let cut_secs = (request.end_ms - request.start_ms) as f64 / 1000.0;
    let progress: Arc<dyn Fn(f64) + Send + Sync> = Arc::new(|fraction| {
        log::debug!(target: "frag_cut::export", "progress {:.0}%", fraction * 100.0);
    });
    run_ffmpeg_blocking(args, Some(cut_secs), Some(progress))?;

    Ok(output)
}

/// Runs the export on a dedicated thread and delivers the outcome over
/// `events`. There is no cancellation and no timeout: a hung encoder hangs
/// that one export.
pub fn spawn_export(request: ExportRequest, events: Sender<ExportOutcome>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let outcome = export_fragment(&request);
        if let Err(e) = &outcome {
            log::error!(target: "frag_cut::export", "export failed: {}", e);
        }
        let _ = events.send(outcome);
    })
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::export::discovery::reset_ffmpeg_path_cache;

    #[test]
    fn output_name_embeds_stem_timestamps_and_extension() {
        let output = fragment_output_path(Path::new("/videos/holiday.clip.mp4"), 5_000, 10_000);
        assert_eq!(
            output,
            PathBuf::from("/videos/fragcut_out/holiday.clip_00-00-05_00-00-10.mp4")
        );
    }

    #[test]
    fn output_name_survives_missing_extension() {
        let output = fragment_output_path(Path::new("/videos/raw"), 0, 61_000);
        assert_eq!(
            output,
            PathBuf::from("/videos/fragcut_out/raw_00-00-00_00-01-01")
        );
    }

    #[test]
    fn output_path_is_deterministic() {
        let a = fragment_output_path(Path::new("/v/a.mkv"), 1_000, 2_000);
        let b = fragment_output_path(Path::new("/v/a.mkv"), 1_000, 2_000);
        assert_eq!(a, b);
    }

    #[test]
    fn cut_args_seek_before_input_and_stream_copy() {
        let args = build_cut_args(
            Path::new("/videos/in.mp4"),
            Path::new("/videos/fragcut_out/out.mp4"),
            5_000,
            10_000,
        );
        let ss = args.iter().position(|a| a == "-ss").expect("-ss");
        let input = args.iter().position(|a| a == "-i").expect("-i");
        assert!(ss < input, "-ss must precede -i for input seeking");
        assert_eq!(args[ss + 1], "5.000");
        let to = args.iter().position(|a| a == "-to").expect("-to");
        assert_eq!(args[to + 1], "10.000");
        assert!(args.windows(2).any(|w| w[0] == "-c" && w[1] == "copy"));
        assert_eq!(args[0], "-y");
        assert_eq!(args.last().map(String::as_str), Some("/videos/fragcut_out/out.mp4"));
    }

    #[test]
    fn export_rejects_missing_source() {
        let request = ExportRequest {
            source: PathBuf::from("/no/such/source.mp4"),
            start_ms: 0,
            end_ms: 1_000,
        };
        assert!(matches!(
            export_fragment(&request),
            Err(AppError::FileNotFound(_))
        ));
    }

    #[test]
    fn export_rejects_empty_window() {
        let file = tempfile::NamedTempFile::with_suffix(".mp4").expect("temp file");
        let request = ExportRequest {
            source: file.path().to_path_buf(),
            start_ms: 1_000,
            end_ms: 1_000,
        };
        assert!(matches!(
            export_fragment(&request),
            Err(AppError::InvalidSelection)
        ));
    }

    #[test]
    #[serial]
    fn missing_encoder_is_reported_without_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("clip.mp4");
        std::fs::write(&source, b"not really video").expect("write source");

        let saved = std::env::var("FFMPEG_PATH").ok();
        unsafe { std::env::set_var("FFMPEG_PATH", "/no/such/ffmpeg-binary") };
        reset_ffmpeg_path_cache();

        let request = ExportRequest {
            source: source.clone(),
            start_ms: 5_000,
            end_ms: 10_000,
        };
        let err = export_fragment(&request).expect_err("encoder missing");
        assert!(matches!(err, AppError::FfmpegNotFound(_)));

        let output = fragment_output_path(&source, 5_000, 10_000);
        assert!(!output.exists(), "no output file may be created");

        match saved {
            Some(value) => unsafe { std::env::set_var("FFMPEG_PATH", value) },
            None => unsafe { std::env::remove_var("FFMPEG_PATH") },
        }
        reset_ffmpeg_path_cache();
    }
}
