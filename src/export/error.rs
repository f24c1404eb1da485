//! Map FFmpeg exit codes to user-facing messages.
//!
//! Exit codes are from ffmpeg.c: 1 (general), 69 (rate exceeded), 123 (hard
//! exit), 255 (signal). -1 is used for spawn failure. The captured stderr is
//! kept as detail for diagnostics.

/// Short summary for the status line; the detail carries the stderr tail.
#[derive(Debug, Clone)]
pub struct FfmpegErrorPayload {
    pub summary: String,
    pub detail: String,
}

/// Maps an FFmpeg exit code to a short summary, with stderr passed through
/// as detail.
pub fn parse_ffmpeg_error(stderr: &str, exit_code: Option<i32>) -> FfmpegErrorPayload {
    let summary = match exit_code {
        Some(code) => known_exit_code_summary(code)
            .unwrap_or_else(|| format!("FFmpeg failed (exit code {}).", code)),
        None => fallback_summary(stderr),
    };
    FfmpegErrorPayload {
        summary,
        detail: stderr.trim().to_string(),
    }
}

fn known_exit_code_summary(code: i32) -> Option<String> {
    match code {
        -1 => Some("FFmpeg not found or failed to start.".into()),
        1 => Some("FFmpeg failed.".into()),
        69 => Some("Encoding rate limit exceeded.".into()),
        123 | 255 => Some("Export was stopped.".into()),
        _ => None,
    }
}

const ELLIPSIS: &str = "…";
const MAX_SUMMARY_BYTES: usize = 120;

/// Last non-empty stderr line, truncated. FFmpeg prints the decisive error
/// at the end of its output.
fn fallback_summary(stderr: &str) -> String {
    let line = stderr
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim())
        .unwrap_or(stderr);
    if line.len() <= MAX_SUMMARY_BYTES {
        return line.to_string();
    }
    let mut cut = MAX_SUMMARY_BYTES.saturating_sub(ELLIPSIS.len());
    while !line.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &line[..cut], ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_failure_code() {
        let p = parse_ffmpeg_error("", Some(1));
        assert_eq!(p.summary, "FFmpeg failed.");
    }

    #[test]
    fn signal_codes_read_as_stopped() {
        assert_eq!(parse_ffmpeg_error("", Some(123)).summary, "Export was stopped.");
        assert_eq!(parse_ffmpeg_error("", Some(255)).summary, "Export was stopped.");
    }

    #[test]
    fn spawn_failure_code() {
        let p = parse_ffmpeg_error("no such file", Some(-1));
        assert!(p.summary.contains("not found") || p.summary.contains("start"));
    }

    #[test]
    fn unknown_code_gets_short_summary_with_detail() {
        let p = parse_ffmpeg_error("Invalid data found when processing input", Some(42));
        assert_eq!(p.summary, "FFmpeg failed (exit code 42).");
        assert_eq!(p.detail, "Invalid data found when processing input");
    }

    #[test]
    fn no_code_uses_last_stderr_line() {
        let p = parse_ffmpeg_error("first line\nOutput file does not contain any stream\n", None);
        assert_eq!(p.summary, "Output file does not contain any stream");
    }

    #[test]
    fn long_stderr_is_truncated() {
        let long = "a".repeat(300);
        let p = parse_ffmpeg_error(&long, None);
        assert!(p.summary.len() <= MAX_SUMMARY_BYTES + ELLIPSIS.len());
        assert!(p.summary.ends_with(ELLIPSIS));
    }
}
