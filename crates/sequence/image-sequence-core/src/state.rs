//! Read-only views of engine state and per-tick results.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Snapshot of a [`crate::PlaybackEngine`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// `None` iff the sequence is empty.
    pub current_index: Option<usize>,
    pub elapsed_in_frame: Duration,
    pub frame_duration: Duration,
    pub is_playing: bool,
    pub looping: bool,
    /// A one-shot run reached the end of its last frame.
    pub finished: bool,
    pub loops_completed: u64,
    pub frame_count: usize,
}

/// What a single advance did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    /// Index to display, set when at least one frame step was taken.
    pub frame: Option<usize>,
    /// At least one loop boundary was crossed (or a one-shot run completed).
    pub looped: bool,
    /// Number of loop boundaries crossed during this advance.
    pub loops: u64,
    /// A one-shot run completed during this advance.
    pub finished: bool,
}

impl TickOutcome {
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.frame.is_none() && !self.looped
    }
}
