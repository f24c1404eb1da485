//! Playback/selection coordinator.
//!
//! Owns the playback session, the selection marks, and the user-visible
//! status line, and is the single consumer of ticks, user commands, engine
//! notifications, and export outcomes. Every state mutation funnels through
//! one event loop, so the coordinator itself needs no locking against the
//! engine's delivery threads or the export worker.

use std::path::{Path, PathBuf};

use crate::config::AppOptions;
use crate::error::AppError;
use crate::export::{self, ExportOutcome, ExportRequest};
use crate::player::{MediaSession, PlayerEvent};
use crate::selection::Selection;
use crate::timefmt::format_timestamp;

/// Player lifecycle as the coordinator last observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerLifecycle {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Stopped,
    Ended,
}

/// Mutable playback state for the currently loaded file. Replaced wholesale
/// on every successful load.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    pub file: Option<PathBuf>,
    pub duration_ms: u64,
    pub position_ms: u64,
    pub lifecycle: PlayerLifecycle,
}

/// What the front renders after a tick or a state change. The slider value
/// is derived from position/duration and never feeds back into playback
/// except through [`Coordinator::seek_slider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiSnapshot {
    pub position_label: String,
    pub duration_label: String,
    pub slider: u64,
    pub status: String,
    pub loop_enabled: bool,
    pub playing: bool,
}

pub struct Coordinator {
    session: MediaSession,
    playback: PlaybackSession,
    selection: Selection,
    slider_steps: u64,
    status: String,
    exporting: bool,
}

impl Coordinator {
    pub fn new(session: MediaSession, options: &AppOptions) -> Self {
        Self {
            session,
            playback: PlaybackSession::default(),
            selection: Selection::new(),
            slider_steps: options.effective_slider_steps(),
            status: "Ready".to_string(),
            exporting: false,
        }
    }

    pub fn playback(&self) -> &PlaybackSession {
        &self.playback
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Loads a file. Re-entrant: loading over an already loaded file always
    /// resets the playback session and the selection, loop flag included.
    /// On failure the prior state is left intact.
    pub fn load(&mut self, path: &Path) -> Result<(), AppError> {
        let prior = self.playback.lifecycle;
        self.playback.lifecycle = PlayerLifecycle::Loading;
        match self.session.load(path) {
            Ok(()) => {
                self.playback = PlaybackSession {
                    file: Some(path.to_path_buf()),
                    duration_ms: 0,
                    position_ms: 0,
                    lifecycle: PlayerLifecycle::Playing,
                };
                self.selection.reset();
                self.status = format!("Loaded: {}", file_label(path));
                Ok(())
            }
            Err(e) => {
                self.playback.lifecycle = prior;
                self.status = e.to_string();
                Err(e)
            }
        }
    }

    /// Play/pause toggle. A message instead of a transition when nothing is
    /// loaded.
    pub fn toggle_play(&mut self) {
        if self.playback.file.is_none() {
            self.status = "Load a video first".to_string();
            return;
        }
        if self.playback.lifecycle == PlayerLifecycle::Playing {
            self.session.pause();
            self.playback.lifecycle = PlayerLifecycle::Paused;
            self.status = "Paused".to_string();
        } else {
            self.session.play();
            self.playback.lifecycle = PlayerLifecycle::Playing;
            self.status = "Playing".to_string();
        }
    }

    pub fn stop(&mut self) {
        self.session.stop();
        self.playback.lifecycle = PlayerLifecycle::Stopped;
        self.playback.position_ms = 0;
        self.status = "Stopped".to_string();
    }

    /// Converts a slider step back to milliseconds and seeks. Ignored while
    /// the duration is unknown, so a drag during load cannot snap playback
    /// to zero.
    pub fn seek_slider(&mut self, step: u64) {
        if self.playback.duration_ms == 0 {
            return;
        }
        let step = step.min(self.slider_steps);
        let ms = step * self.playback.duration_ms / self.slider_steps;
        self.session.seek_to(ms);
    }

    /// Marks the fragment start at the engine's current position. Reads the
    /// engine directly rather than the value cached by the last tick.
    pub fn set_selection_start(&mut self) {
        if self.playback.file.is_none() {
            self.status = "Load a video first".to_string();
            return;
        }
        let ms = self.session.position_ms();
        self.selection.mark_start(ms);
        self.status = format!("Start: {}", format_timestamp(ms));
    }

    pub fn set_selection_end(&mut self) {
        if self.playback.file.is_none() {
            self.status = "Load a video first".to_string();
            return;
        }
        let ms = self.session.position_ms();
        self.selection.mark_end(ms);
        self.status = format!("End: {}", format_timestamp(ms));
    }

    /// Enables or disables fragment-loop mode. Enabling rewinds to the start
    /// mark and forces playback regardless of the prior play/pause state;
    /// disabling leaves playback where it is.
    pub fn toggle_fragment_loop(&mut self) -> Result<bool, AppError> {
        match self.selection.toggle_loop() {
            Ok(true) => {
                self.session.seek_to(self.selection.start_ms());
                self.session.play();
                self.playback.lifecycle = PlayerLifecycle::Playing;
                self.status = format!(
                    "Fragment loop: {} - {}",
                    format_timestamp(self.selection.start_ms()),
                    format_timestamp(self.selection.end_ms())
                );
                Ok(true)
            }
            Ok(false) => {
                self.status = "Fragment loop disabled".to_string();
                Ok(false)
            }
            Err(e) => {
                self.status = e.to_string();
                Err(e)
            }
        }
    }

    /// One position poll. Refreshes the duration once the engine reports it,
    /// caches the position, and enforces the loop boundary. The boundary is
    /// checked on every tick, not only at end of media, so a fragment ending
    /// mid-file loops without waiting for `EndReached`. The observed
    /// overshoot stays visible for this one tick; the next poll reads the
    /// start mark.
    pub fn tick(&mut self) -> UiSnapshot {
        let duration = self.session.duration_ms();
        if duration > 0 {
            self.playback.duration_ms = duration;
        }
        self.playback.position_ms = self.session.position_ms();

        if self.selection.loop_enabled()
            && self.selection.is_valid()
            && self.playback.position_ms >= self.selection.end_ms()
        {
            self.session.seek_to(self.selection.start_ms());
        }

        self.snapshot()
    }

    /// Applies an engine notification. Runs on the same loop as ticks and
    /// commands; the engine never touches coordinator state directly.
    ///
    /// `EndReached` covers the case where end of file arrives before the
    /// tick-based boundary check would have caught it (end mark past the
    /// real media end, or coinciding with it).
    pub fn handle_player_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::EndReached => {
                if self.selection.loop_enabled() && self.selection.is_valid() {
                    self.session.seek_to(self.selection.start_ms());
                    self.session.play();
                    self.playback.lifecycle = PlayerLifecycle::Playing;
                } else {
                    self.playback.lifecycle = PlayerLifecycle::Ended;
                }
            }
            PlayerEvent::Playing => self.playback.lifecycle = PlayerLifecycle::Playing,
            PlayerEvent::Paused => self.playback.lifecycle = PlayerLifecycle::Paused,
            PlayerEvent::Stopped => self.playback.lifecycle = PlayerLifecycle::Stopped,
        }
    }

    /// Re-validates the selection and hands back the request for the export
    /// worker. The blocking invocation runs off this thread; the outcome
    /// comes back through [`Coordinator::handle_export_outcome`].
    pub fn begin_export(&mut self) -> Result<ExportRequest, AppError> {
        let Some(source) = self.playback.file.clone() else {
            self.status = "Load a video first".to_string();
            return Err(AppError::file_not_found("no video loaded"));
        };
        if !self.selection.is_valid() {
            self.status = AppError::InvalidSelection.to_string();
            return Err(AppError::InvalidSelection);
        }
        if self.exporting {
            self.status = "Export already running".to_string();
            return Err(AppError::from("Another export is already running"));
        }

        self.exporting = true;
        self.status = "Exporting fragment...".to_string();
        Ok(ExportRequest {
            source,
            start_ms: self.selection.start_ms(),
            end_ms: self.selection.end_ms(),
        })
    }

    /// Applies the export worker's outcome to the status line. The full
    /// FFmpeg stderr has already been logged by the runner.
    pub fn handle_export_outcome(&mut self, outcome: &ExportOutcome) {
        self.exporting = false;
        match outcome {
            Ok(path) => {
                self.status = format!("Saved: {}", path.display());
            }
            Err(AppError::FfmpegFailed { code, stderr }) => {
                let payload = export::parse_ffmpeg_error(stderr, Some(*code));
                self.status = payload.summary;
            }
            Err(e) => {
                self.status = e.to_string();
            }
        }
    }

    pub fn snapshot(&self) -> UiSnapshot {
        let slider = if self.playback.duration_ms > 0 {
            (self.playback.position_ms * self.slider_steps / self.playback.duration_ms)
                .min(self.slider_steps)
        } else {
            0
        };
        UiSnapshot {
            position_label: format_timestamp(self.playback.position_ms),
            duration_label: format_timestamp(self.playback.duration_ms),
            slider,
            status: self.status.clone(),
            loop_enabled: self.selection.loop_enabled(),
            playing: self.playback.lifecycle == PlayerLifecycle::Playing,
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
