use std::path::Path;

use super::MediaEngine;
use crate::error::AppError;

/// Wraps the raw engine with the call rules the coordinator relies on: load
/// validates the path, seeks clamp to the known duration, and seeking while
/// the duration is unknown is a no-op.
pub struct MediaSession {
    engine: Box<dyn MediaEngine>,
}

impl MediaSession {
    pub fn new(engine: Box<dyn MediaEngine>) -> Self {
        Self { engine }
    }

    /// Loads a file and starts playback. Fails with `FileNotFound` unless
    /// the path is a regular file.
    pub fn load(&mut self, path: &Path) -> Result<(), AppError> {
        if !path.is_file() {
            return Err(AppError::file_not_found(path.display().to_string()));
        }
        self.engine.load(path)
    }

    pub fn play(&mut self) {
        self.engine.play();
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    /// Clamps to `[0, duration]`. Does nothing while the duration is still
    /// unknown, so there is no target to clamp against.
    pub fn seek_to(&mut self, ms: u64) {
        let duration = self.engine.duration_ms();
        if duration == 0 {
            return;
        }
        self.engine.seek_to(ms.min(duration));
    }

    pub fn position_ms(&self) -> u64 {
        self.engine.position_ms()
    }

    /// 0 means "not yet known", never "zero-length media".
    pub fn duration_ms(&self) -> u64 {
        self.engine.duration_ms()
    }
}
