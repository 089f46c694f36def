//! Image Sequence Core (engine-agnostic)
//!
//! Tick-driven playback of an ordered list of frames with looping and a
//! coalesced "loop completed" notification. Rendering and event delivery are
//! left to host adapters through the [`RenderSink`] and [`LoopSink`] traits.

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod sinks;
pub mod source;
pub mod state;
pub mod view;

// Re-exports for consumers (adapters)
pub use config::{
    frame_duration_for_fps, PlaybackConfig, SequenceProps, DEFAULT_FRAMES_PER_SECOND,
};
pub use engine::{sanitize_seconds, PlaybackEngine};
pub use error::SequenceError;
pub use loader::{LoadProgress, LoadRequest, SequenceLoader};
pub use sinks::{ChannelLoopSink, LoopSink, Looped, RenderSink};
pub use source::FrameSource;
pub use state::{PlaybackState, TickOutcome};
pub use view::ImageSequenceView;
