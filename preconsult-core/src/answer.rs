use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of capture failure categories.
///
/// Every failure mode of the speech input boundary collapses into one of
/// these. The `Display` form is the exact sentinel string that appears in
/// reports, so downstream text never depends on `Debug` formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum CaptureFailure {
    /// The listening window elapsed without any speech.
    #[error("NO_RESPONSE_TIMEOUT")]
    NoResponseTimeout,
    /// Speech was captured but could not be decoded into text.
    #[error("UNRECOGNIZED")]
    Unrecognized,
    /// The microphone or another audio component failed.
    #[error("DEVICE_ERROR")]
    DeviceError,
    /// The transcription service was unreachable or returned an error.
    #[error("SERVICE_ERROR")]
    ServiceError,
}

impl CaptureFailure {
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::NoResponseTimeout => "NO_RESPONSE_TIMEOUT",
            Self::Unrecognized => "UNRECOGNIZED",
            Self::DeviceError => "DEVICE_ERROR",
            Self::ServiceError => "SERVICE_ERROR",
        }
    }
}

/// One captured answer: transcribed text or a sentinel failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Text(String),
    Failed(CaptureFailure),
}

impl Answer {
    /// Normalizes a raw transcript. Trimmed, and an empty transcript counts
    /// as unrecognized speech rather than a valid (blank) answer.
    pub fn from_transcript(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Failed(CaptureFailure::Unrecognized)
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Text as it appears in reports and live progress: the transcript for
    /// valid answers, the sentinel string otherwise.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Text(t) => t,
            Self::Failed(f) => f.sentinel(),
        }
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_text())
    }
}
