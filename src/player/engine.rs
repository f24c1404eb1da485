use std::path::Path;

use crate::error::AppError;

/// Raw playback engine boundary.
///
/// Implementations report positions in milliseconds and never negative
/// (engine reads below zero are clamped to 0). Notifications are delivered
/// as [`PlayerEvent`]s from whatever thread the engine uses internally;
/// consumers serialize them onto one event loop instead of locking.
pub trait MediaEngine: Send {
    /// Loads `path` and starts playback from the beginning.
    fn load(&mut self, path: &Path) -> Result<(), AppError>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Stops playback and resets the engine position to zero.
    fn stop(&mut self);

    fn seek_to(&mut self, ms: u64);

    /// Current position. May lag the true decode position; callers tolerate
    /// staleness rather than block on the engine.
    fn position_ms(&self) -> u64;

    /// Media duration, or 0 while metadata is still unknown.
    fn duration_ms(&self) -> u64;
}

/// Asynchronous notifications from the engine's own delivery context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    EndReached,
    Playing,
    Paused,
    Stopped,
}
