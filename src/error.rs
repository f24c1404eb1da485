//! App error type shared by the playback, selection, and export paths.

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Set valid start and end marks first")]
    InvalidSelection,

    #[error("{0}")]
    FfmpegNotFound(String),

    #[error("FFmpeg failed (code {code}): {stderr}")]
    FfmpegFailed { code: i32, stderr: String },

    #[error("Playback engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("{0}")]
    Playback(String),
}

impl AppError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn ffmpeg_failed(code: i32, stderr: impl Into<String>) -> Self {
        Self::FfmpegFailed {
            code,
            stderr: stderr.into(),
        }
    }
}

impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::FfmpegFailed {
            code: -1,
            stderr: s,
        }
    }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self {
        s.to_string().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_is_generic_ffmpeg_failure() {
        let e = AppError::from("some error message".to_string());
        match &e {
            AppError::FfmpegFailed { code, stderr } => {
                assert_eq!(*code, -1);
                assert_eq!(stderr, "some error message");
            }
            _ => panic!("expected FfmpegFailed"),
        }
    }

    #[test]
    fn from_str_works() {
        let e: AppError = "boom".into();
        assert!(matches!(e, AppError::FfmpegFailed { .. }));
    }

    #[test]
    fn invalid_selection_message_is_user_facing() {
        assert_eq!(
            AppError::InvalidSelection.to_string(),
            "Set valid start and end marks first"
        );
    }

    #[test]
    fn io_error_converts() {
        let e: AppError = std::io::Error::other("disk gone").into();
        assert!(matches!(e, AppError::Io(_)));
    }
}
