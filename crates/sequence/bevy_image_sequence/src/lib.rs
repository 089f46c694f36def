//! Bevy adapter for `image-sequence-core`.
//!
//! Each entity with an [`ImageSequence`] is ticked from `Time` in `Update`.
//! The shown frame lands in [`DisplayedFrame`] (and in the entity's
//! `Handle<Image>` when it has one); completed loops arrive as
//! [`SequenceLooped`] events.

use bevy::prelude::*;

pub mod components;
pub mod systems;

pub use components::{DisplayedFrame, ImageSequence};
pub use image_sequence_core::PlaybackConfig;

/// Fired once per update in which a sequence completed at least one loop.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceLooped {
    pub entity: Entity,
}

/// Ordering handle for the adapter's systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageSequenceSet;

pub struct ImageSequencePlugin;

impl Plugin for ImageSequencePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SequenceLooped>().add_systems(
            Update,
            (
                systems::attach_sequences_system,
                systems::tick_sequences_system,
                systems::detach_sequences_system,
            )
                .chain()
                .in_set(ImageSequenceSet),
        );
    }
}
