//! Runtime options for the playback loop.
//!
//! Every field is optional with a defaulted `effective_*` accessor, so a
//! missing or partial options file behaves like the built-in defaults.

use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppOptions {
    /// Position poll interval in milliseconds. Default 100.
    pub tick_interval_ms: Option<u64>,
    /// Number of discrete timeline slider steps. Default 1000.
    pub slider_steps: Option<u64>,
}

impl AppOptions {
    pub fn effective_tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.unwrap_or(100).clamp(20, 1000)
    }

    pub fn effective_slider_steps(&self) -> u64 {
        self.slider_steps.unwrap_or(1000).max(1)
    }

    /// Reads options from a JSON file. Unknown fields are ignored.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            AppError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid options file {}: {}", path.display(), e),
            ))
        })
    }
}
