//! Parsing of FFmpeg's `-progress pipe:1` stream.

use std::sync::LazyLock;

use regex::Regex;

static OUT_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"out_time_ms=(\d+)").expect("invalid out_time regex"));
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Duration: (\d+):(\d+):([\d.]+)").expect("invalid duration regex")
});

/// Parses one line of FFmpeg output.
///
/// Returns `(fraction, duration)`: a completion fraction in [0, 1] when the
/// line carries an `out_time_ms` counter and the duration is known, and the
/// source duration in seconds when the line carries a `Duration:` header.
/// `out_time_ms` is, despite the name, in microseconds.
pub fn parse_progress_line(line: &str, known_duration: Option<f64>) -> (Option<f64>, Option<f64>) {
    if let Some(caps) = DURATION_RE.captures(line) {
        let hours: f64 = caps[1].parse().unwrap_or(0.0);
        let minutes: f64 = caps[2].parse().unwrap_or(0.0);
        let seconds: f64 = caps[3].parse().unwrap_or(0.0);
        return (None, Some(hours * 3600.0 + minutes * 60.0 + seconds));
    }

    if let Some(caps) = OUT_TIME_RE.captures(line) {
        if let Some(duration) = known_duration.filter(|&d| d > 0.0) {
            let micros: i64 = caps[1].parse().unwrap_or(0);
            let fraction = ((micros as f64 / 1_000_000.0) / duration).min(1.0);
            return (Some(fraction), Some(duration));
        }
    }

    (None, known_duration)
}
