//! FFmpeg process spawning and output capture.
//!
//! Spawns FFmpeg as a child process, keeps a bounded tail of stderr for
//! diagnostics, and parses the `-progress pipe:1` stream on stdout. Reader
//! threads drain both pipes while the calling thread waits for the exit
//! status; there is no cancellation and no timeout on the child.

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};

#[cfg(windows)]
use std::os::windows::process::CommandExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use parking_lot::Mutex;

use super::discovery::get_ffmpeg_path;
use super::progress::parse_progress_line;
use crate::error::AppError;

/// AtomicU64 cannot hold Option<f64>, so the shared duration is stored as
/// f64 bits with u64::MAX meaning "not yet known".
const NONE_DURATION_BITS: u64 = u64::MAX;

/// Keep only the last N bytes of stderr to avoid unbounded memory growth.
const MAX_STDERR_BYTES: usize = 64 * 1024;

/// Configuration for one output stream reader (stdout or stderr).
struct ReadStreamConfig {
    collect: Option<Arc<Mutex<Vec<u8>>>>,
    duration: Arc<AtomicU64>,
    /// When set, receives completion fractions in [0, 1].
    progress_callback: Option<Arc<dyn Fn(f64) + Send + Sync>>,
}

fn decode_duration_bits(bits: u64) -> Option<f64> {
    if bits == NONE_DURATION_BITS {
        None
    } else {
        Some(f64::from_bits(bits))
    }
}

fn read_stream<R: std::io::Read + Send + 'static>(
    reader: R,
    config: ReadStreamConfig,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut known_duration = decode_duration_bits(config.duration.load(Ordering::Relaxed));
        for line in BufReader::new(reader).lines().map_while(Result::ok) {
            if let Some(buf) = &config.collect {
                let mut guard = buf.lock();
                guard.extend_from_slice(line.as_bytes());
                guard.push(b'\n');
                if guard.len() > MAX_STDERR_BYTES {
                    let excess = guard.len() - MAX_STDERR_BYTES;
                    guard.drain(..excess);
                }
            }
            let (fraction, duration) = parse_progress_line(&line, known_duration);
            if let Some(duration) = duration {
                known_duration = Some(duration);
                config.duration.store(duration.to_bits(), Ordering::Relaxed);
            }
            if let (Some(fraction), Some(callback)) = (fraction, config.progress_callback.as_ref())
            {
                callback(fraction);
            }
        }
    })
}

/// Run FFmpeg and block until completion.
///
/// - `duration_secs`: expected output duration; when provided, progress can
///   be computed from the first `out_time_ms` counter without waiting for a
///   `Duration:` header on stderr.
/// - `progress_callback`: receives completion fractions in [0, 1].
///
/// A binary that cannot be located or executed maps to `FfmpegNotFound`; a
/// non-zero exit maps to `FfmpegFailed` carrying the captured stderr tail.
pub fn run_ffmpeg_blocking(
    args: Vec<String>,
    duration_secs: Option<f64>,
    progress_callback: Option<Arc<dyn Fn(f64) + Send + Sync>>,
) -> Result<(), AppError> {
    let ffmpeg_path = get_ffmpeg_path()?;

    let input_arg = args
        .iter()
        .position(|a| a == "-i")
        .and_then(|i| args.get(i + 1));
    let output_arg = args.last();
    log::debug!(
        target: "frag_cut::export::runner",
        "spawning FFmpeg: path={}, input={:?}, output={:?}",
        ffmpeg_path.display(),
        input_arg,
        output_arg
    );

    let mut cmd = Command::new(&ffmpeg_path);
    cmd.args(&args).stdout(Stdio::piped()).stderr(Stdio::piped());
    #[cfg(windows)]
    cmd.creation_flags(0x08000000); // CREATE_NO_WINDOW
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::FfmpegNotFound(format!(
                "failed to run {}: {}",
                ffmpeg_path.display(),
                e
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let stdout = match child.stdout.take() {
        Some(s) => s,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AppError::from("Failed to capture stdout"));
        }
    };
    let stderr = match child.stderr.take() {
        Some(s) => s,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(AppError::from("Failed to capture stderr"));
        }
    };

    let duration = Arc::new(AtomicU64::new(
        duration_secs
            .filter(|&d| d > 0.0)
            .map(f64::to_bits)
            .unwrap_or(NONE_DURATION_BITS),
    ));
    let stderr_buffer = Arc::new(Mutex::new(Vec::new()));

    let stdout_handle = read_stream(
        stdout,
        ReadStreamConfig {
            collect: None,
            duration: Arc::clone(&duration),
            progress_callback,
        },
    );
    let stderr_handle = read_stream(
        stderr,
        ReadStreamConfig {
            collect: Some(Arc::clone(&stderr_buffer)),
            duration: Arc::clone(&duration),
            progress_callback: None,
        },
    );

    let _ = stdout_handle.join();
    let _ = stderr_handle.join();

    let status = child.wait().map_err(|e| e.to_string())?;

    let stderr_bytes = stderr_buffer.lock().clone();
    let stderr_str = String::from_utf8_lossy(&stderr_bytes).to_string();

    if status.success() {
        log::info!(
            target: "frag_cut::export::runner",
            "FFmpeg completed successfully"
        );
        Ok(())
    } else {
        let code = status.code().unwrap_or(-1);
        let tail = stderr_str
            .lines()
            .rev()
            .take(3)
            .collect::<Vec<_>>()
            .join("; ");
        log::error!(
            target: "frag_cut::export::runner",
            "FFmpeg failed (code={}): {}",
            code,
            tail
        );
        Err(AppError::FfmpegFailed {
            code,
            stderr: stderr_str,
        })
    }
}
