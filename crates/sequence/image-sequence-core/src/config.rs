//! Host-facing configuration for an image sequence.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SequenceError;

pub const DEFAULT_FRAMES_PER_SECOND: u32 = 24;

fn default_fps() -> u32 {
    DEFAULT_FRAMES_PER_SECOND
}

fn default_loop() -> bool {
    true
}

/// Timing and looping options.
///
/// The per-frame duration is `frame_duration_ms` when present, otherwise
/// `1s / frames_per_second`. A resulting zero duration makes playback inert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackConfig {
    #[serde(default = "default_fps")]
    pub frames_per_second: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_duration_ms: Option<u32>,
    #[serde(rename = "loop", default = "default_loop")]
    pub looping: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            frame_duration_ms: None,
            looping: true,
        }
    }
}

impl PlaybackConfig {
    pub fn frame_duration(&self) -> Duration {
        match self.frame_duration_ms {
            Some(ms) => Duration::from_millis(u64::from(ms)),
            None => frame_duration_for_fps(self.frames_per_second),
        }
    }

    /// Reject settings that would leave a non-empty sequence inert.
    pub fn validate(&self) -> Result<(), SequenceError> {
        if self.frame_duration().is_zero() {
            return Err(SequenceError::InvalidProps {
                reason: "frame duration must be positive".into(),
            });
        }
        Ok(())
    }
}

/// `1s / fps`, or zero when `fps == 0`.
pub fn frame_duration_for_fps(fps: u32) -> Duration {
    if fps == 0 {
        Duration::ZERO
    } else {
        Duration::from_secs(1) / fps
    }
}

/// Props as a host declares them on the component.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceProps {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(flatten)]
    pub playback: PlaybackConfig,
}

impl SequenceProps {
    pub fn from_json(raw: &str) -> Result<Self, SequenceError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String, SequenceError> {
        Ok(serde_json::to_string(self)?)
    }
}
