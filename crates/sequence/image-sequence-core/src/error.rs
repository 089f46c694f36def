//! Error types for sequence configuration and frame loading.
//!
//! The playback engine itself never fails; these errors surface only where a
//! host hands us something to parse or reports a load result.

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SequenceError {
    /// An image reference was empty or whitespace only.
    #[error("Empty image source")]
    EmptySource,

    /// Host props failed validation.
    #[error("Invalid sequence props: {reason}")]
    InvalidProps { reason: String },

    /// The host could not load or decode a frame.
    #[error("Frame {index} failed to load: {reason}")]
    FrameLoad { index: usize, reason: String },

    /// JSON (de)serialization error.
    #[error("JSON error: {reason}")]
    Json { reason: String },
}

impl SequenceError {
    pub fn frame_load(index: usize, reason: impl Into<String>) -> Self {
        Self::FrameLoad {
            index,
            reason: reason.into(),
        }
    }

    /// Category string for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptySource | Self::InvalidProps { .. } => "config",
            Self::FrameLoad { .. } => "load",
            Self::Json { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for SequenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            reason: err.to_string(),
        }
    }
}
