use bevy::prelude::*;
use image_sequence_core::{PlaybackConfig, PlaybackEngine};

/// An image sequence playing on this entity.
///
/// Inserting the component attaches it (playback starts on the next update);
/// removing it detaches and drops the frames.
#[derive(Component, Debug)]
pub struct ImageSequence {
    pub engine: PlaybackEngine<Handle<Image>>,
}

impl ImageSequence {
    pub fn new(frames: Vec<Handle<Image>>, config: &PlaybackConfig) -> Self {
        let mut engine = PlaybackEngine::new(config);
        engine.set_sequence(frames, config.frame_duration());
        Self { engine }
    }
}

/// Index of the frame currently shown. Written whenever the frame changes.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayedFrame(pub usize);
