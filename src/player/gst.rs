//! GStreamer playbin engine.
//!
//! Position and duration queries go straight to the playbin. Bus messages
//! arrive on GStreamer's streaming threads; a sync handler translates them
//! into [`PlayerEvent`]s and forwards them over a channel, so the rest of
//! the app only ever sees them on its own event loop.

use std::path::Path;

use crossbeam_channel::Sender;
use gstreamer as gst;
use gstreamer::prelude::*;

use super::{MediaEngine, PlayerEvent};
use crate::error::AppError;

const PLAYBIN_NAME: &str = "frag-cut-player";

pub struct GstEngine {
    playbin: gst::Element,
}

impl GstEngine {
    /// Initializes GStreamer and builds a playbin. Both steps fail with
    /// `EngineUnavailable` when the runtime libraries are missing.
    pub fn new(events: Sender<PlayerEvent>) -> Result<Self, AppError> {
        gst::init().map_err(|e| AppError::EngineUnavailable(e.to_string()))?;

        let playbin = gst::ElementFactory::make("playbin")
            .name(PLAYBIN_NAME)
            .build()
            .map_err(|e| AppError::EngineUnavailable(e.to_string()))?;

        let bus = playbin
            .bus()
            .ok_or_else(|| AppError::EngineUnavailable("playbin has no message bus".to_string()))?;
        bus.set_sync_handler(move |_bus, message| {
            if let Some(event) = translate_message(message) {
                let _ = events.send(event);
            }
            gst::BusSyncReply::Drop
        });

        Ok(Self { playbin })
    }
}

/// Maps bus messages to player events. State-change messages from anything
/// but the playbin itself (decoders, sinks) are ignored.
fn translate_message(message: &gst::Message) -> Option<PlayerEvent> {
    use gst::MessageView;

    match message.view() {
        MessageView::Eos(..) => Some(PlayerEvent::EndReached),
        MessageView::StateChanged(changed) => {
            let from_playbin = message
                .src()
                .is_some_and(|src| src.name() == PLAYBIN_NAME);
            if !from_playbin {
                return None;
            }
            match changed.current() {
                gst::State::Playing => Some(PlayerEvent::Playing),
                gst::State::Paused => Some(PlayerEvent::Paused),
                gst::State::Ready | gst::State::Null => Some(PlayerEvent::Stopped),
                _ => None,
            }
        }
        MessageView::Error(err) => {
            log::error!(
                target: "frag_cut::player::gst",
                "engine error: {} ({:?})",
                err.error(),
                err.debug()
            );
            None
        }
        _ => None,
    }
}

impl MediaEngine for GstEngine {
    fn load(&mut self, path: &Path) -> Result<(), AppError> {
        // from_file_path refuses relative paths, so resolve first.
        let absolute = path.canonicalize()?;
        let uri = url::Url::from_file_path(&absolute)
            .map_err(|_| AppError::file_not_found(path.display().to_string()))?;

        let _ = self.playbin.set_state(gst::State::Null);
        self.playbin.set_property("uri", uri.as_str());
        self.playbin
            .set_state(gst::State::Playing)
            .map_err(|_| AppError::Playback(format!("cannot play {}", path.display())))?;
        Ok(())
    }

    fn play(&mut self) {
        let _ = self.playbin.set_state(gst::State::Playing);
    }

    fn pause(&mut self) {
        let _ = self.playbin.set_state(gst::State::Paused);
    }

    fn stop(&mut self) {
        // Ready keeps the media attached but flushes position back to zero.
        let _ = self.playbin.set_state(gst::State::Ready);
    }

    fn seek_to(&mut self, ms: u64) {
        let target = gst::ClockTime::from_mseconds(ms);
        if let Err(e) = self
            .playbin
            .seek_simple(gst::SeekFlags::FLUSH | gst::SeekFlags::KEY_UNIT, target)
        {
            log::warn!(target: "frag_cut::player::gst", "seek to {}ms failed: {}", ms, e);
        }
    }

    fn position_ms(&self) -> u64 {
        self.playbin
            .query_position::<gst::ClockTime>()
            .map(|t| t.mseconds())
            .unwrap_or(0)
    }

    fn duration_ms(&self) -> u64 {
        self.playbin
            .query_duration::<gst::ClockTime>()
            .map(|t| t.mseconds())
            .unwrap_or(0)
    }
}

impl Drop for GstEngine {
    fn drop(&mut self) {
        let _ = self.playbin.set_state(gst::State::Null);
    }
}
