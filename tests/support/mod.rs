#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;

use parking_lot::Mutex;

use frag_cut_core::config::AppOptions;
use frag_cut_core::coordinator::Coordinator;
use frag_cut_core::player::MediaSession;
use frag_cut_core::test_support::{ScriptedEngine, ScriptedState};

/// A coordinator over a scripted engine plus the handles a test needs to
/// drive it: the shared engine state and a real (empty) temp file so loads
/// pass the regular-file check.
pub struct ScriptedSession {
    pub coordinator: Coordinator,
    state: Arc<Mutex<ScriptedState>>,
    file: tempfile::NamedTempFile,
}

impl ScriptedSession {
    /// Loads the temp file and scripts the given duration (0 = metadata not
    /// yet known).
    pub fn new(duration_ms: u64) -> Self {
        let engine = ScriptedEngine::new();
        let state = engine.state();
        let mut coordinator = Coordinator::new(
            MediaSession::new(Box::new(engine)),
            &AppOptions::default(),
        );
        let file = tempfile::NamedTempFile::with_suffix(".mp4").expect("temp file");
        coordinator.load(file.path()).expect("load scripted file");
        state.lock().duration_ms = duration_ms;
        Self {
            coordinator,
            state,
            file,
        }
    }

    pub fn file_path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    pub fn position(&self) -> u64 {
        self.state.lock().position_ms
    }

    pub fn set_position(&mut self, ms: u64) {
        self.state.lock().position_ms = ms;
    }

    pub fn set_duration(&mut self, ms: u64) {
        self.state.lock().duration_ms = ms;
    }

    pub fn playing(&self) -> bool {
        self.state.lock().playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.state.lock().playing = playing;
    }
}

/// Creates a short synthetic clip with ffmpeg's lavfi testsrc. Panics if
/// FFmpeg is unavailable; smoke tests require it on the machine.
pub fn create_test_video(
    ffmpeg: &Path,
    output_path: &Path,
    duration_secs: f32,
) -> std::io::Result<ExitStatus> {
    Command::new(ffmpeg)
        .args([
            "-loglevel",
            "error",
            "-y",
            "-f",
            "lavfi",
            "-i",
            &format!("testsrc=duration={}:size=320x240:rate=30", duration_secs),
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            output_path.to_string_lossy().as_ref(),
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
}
