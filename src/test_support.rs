//! Test-only playback engine driven by scripted state.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::AppError;
use crate::player::MediaEngine;

/// Scripted engine state. Tests hold a handle and move the clock themselves,
/// so every tick observes exactly what the test arranged.
#[derive(Debug, Default)]
pub struct ScriptedState {
    pub loaded: Option<PathBuf>,
    pub duration_ms: u64,
    pub position_ms: u64,
    pub playing: bool,
}

#[derive(Clone, Default)]
pub struct ScriptedEngine {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle for inspecting and mutating the scripted state after
    /// the engine has been boxed into a session.
    pub fn state(&self) -> Arc<Mutex<ScriptedState>> {
        Arc::clone(&self.state)
    }
}

impl MediaEngine for ScriptedEngine {
    fn load(&mut self, path: &Path) -> Result<(), AppError> {
        let mut state = self.state.lock();
        state.loaded = Some(path.to_path_buf());
        state.position_ms = 0;
        state.playing = true;
        Ok(())
    }

    fn play(&mut self) {
        self.state.lock().playing = true;
    }

    fn pause(&mut self) {
        self.state.lock().playing = false;
    }

    fn stop(&mut self) {
        let mut state = self.state.lock();
        state.playing = false;
        state.position_ms = 0;
    }

    fn seek_to(&mut self, ms: u64) {
        let mut state = self.state.lock();
        let duration = state.duration_ms;
        state.position_ms = if duration == 0 { ms } else { ms.min(duration) };
    }

    fn position_ms(&self) -> u64 {
        self.state.lock().position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.state.lock().duration_ms
    }
}
