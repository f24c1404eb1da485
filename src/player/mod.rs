//! Media playback boundary.
//!
//! [`MediaEngine`] is the raw engine contract, [`MediaSession`] layers the
//! call rules the rest of the app relies on, and [`create_engine`] builds
//! whichever real engine the build carries.

mod engine;
#[cfg(feature = "gst-engine")]
mod gst;
mod session;

pub use engine::{MediaEngine, PlayerEvent};
#[cfg(feature = "gst-engine")]
pub use gst::GstEngine;
pub use session::MediaSession;

use crossbeam_channel::Sender;

use crate::error::AppError;

/// Creates the playback engine backing a session. Fails with
/// `EngineUnavailable` when the build carries no engine or the engine's
/// runtime libraries cannot be initialized.
pub fn create_engine(events: Sender<PlayerEvent>) -> Result<Box<dyn MediaEngine>, AppError> {
    #[cfg(feature = "gst-engine")]
    {
        Ok(Box::new(GstEngine::new(events)?))
    }
    #[cfg(not(feature = "gst-engine"))]
    {
        let _ = events;
        Err(AppError::EngineUnavailable(
            "this build carries no playback engine (enable the gst-engine feature)".to_string(),
        ))
    }
}
