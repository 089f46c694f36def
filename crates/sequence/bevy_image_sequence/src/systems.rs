use bevy::prelude::*;
use log::debug;

use crate::components::{DisplayedFrame, ImageSequence};
use crate::SequenceLooped;

/// Newly inserted sequences start playing and show their first frame.
pub fn attach_sequences_system(
    mut commands: Commands,
    mut added: Query<(Entity, &mut ImageSequence), Added<ImageSequence>>,
) {
    for (entity, mut seq) in &mut added {
        seq.engine.start();
        if let Some(index) = seq.engine.current_index() {
            commands.entity(entity).insert(DisplayedFrame(index));
        }
        debug!(
            "image sequence attached to {entity:?} ({} frames)",
            seq.engine.len()
        );
    }
}

/// Advance every sequence by the frame delta, write the displayed frame and
/// texture, and forward loop notifications as events.
pub fn tick_sequences_system(
    time: Res<Time>,
    mut commands: Commands,
    mut sequences: Query<(
        Entity,
        &mut ImageSequence,
        Option<&mut DisplayedFrame>,
        Option<&mut Handle<Image>>,
    )>,
    mut looped: EventWriter<SequenceLooped>,
) {
    let dt = time.delta();
    for (entity, mut seq, displayed, texture) in &mut sequences {
        let outcome = seq.engine.advance(dt);
        if let Some(index) = outcome.frame {
            match displayed {
                Some(mut shown) => shown.0 = index,
                None => {
                    commands.entity(entity).insert(DisplayedFrame(index));
                }
            }
            if let (Some(mut texture), Some(frame)) = (texture, seq.engine.frames().get(index)) {
                *texture = frame.clone();
            }
        }
        if outcome.looped {
            looped.send(SequenceLooped { entity });
        }
    }
}

/// Removed sequences have already dropped their frames with the component;
/// clear what the adapter added alongside.
pub fn detach_sequences_system(
    mut commands: Commands,
    mut removed: RemovedComponents<ImageSequence>,
) {
    for entity in removed.read() {
        if let Some(mut entity_commands) = commands.get_entity(entity) {
            entity_commands.remove::<DisplayedFrame>();
        }
        debug!("image sequence detached from {entity:?}");
    }
}
