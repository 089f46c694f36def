//! Bookkeeping for frames the host loads asynchronously.
//!
//! Each call to [`SequenceLoader::begin`] opens a new generation. Completions
//! tagged with an older generation belong to a cancelled batch and are
//! dropped, so replacing the images mid-load never mixes frames from two
//! batches.

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::SequenceError;
use crate::source::FrameSource;

/// One frame the host should fetch and decode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub generation: u64,
    pub index: usize,
    pub source: FrameSource,
}

/// Result of reporting one completed load.
#[derive(Debug, PartialEq)]
pub enum LoadProgress<F> {
    /// Completion for a cancelled batch or an unknown index.
    Stale,
    /// Frame 0 is available and may be shown before the rest arrive.
    FirstFrame,
    /// Still waiting on other frames.
    Pending,
    /// Every frame loaded, in sequence order.
    Ready(Vec<F>),
    /// Every request settled but these indices failed.
    Failed(Vec<usize>),
}

#[derive(Debug)]
enum Slot<F> {
    Waiting,
    Loaded(F),
    Failed,
}

#[derive(Debug)]
pub struct SequenceLoader<F> {
    generation: u64,
    slots: Vec<Slot<F>>,
    pending: usize,
}

impl<F> Default for SequenceLoader<F> {
    fn default() -> Self {
        Self {
            generation: 0,
            slots: Vec::new(),
            pending: 0,
        }
    }
}

impl<F> SequenceLoader<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new batch, cancelling whatever was in flight.
    pub fn begin(&mut self, sources: Vec<FrameSource>) -> Vec<LoadRequest> {
        if self.is_loading() {
            debug!(
                "cancelling load generation {} with {} frames outstanding",
                self.generation, self.pending
            );
        }
        self.generation = self.generation.wrapping_add(1);
        self.slots = sources.iter().map(|_| Slot::Waiting).collect();
        self.pending = sources.len();
        let generation = self.generation;
        sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| LoadRequest {
                generation,
                index,
                source,
            })
            .collect()
    }

    /// Drop the current batch; later completions for it become stale.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.slots.clear();
        self.pending = 0;
    }

    pub fn complete(
        &mut self,
        generation: u64,
        index: usize,
        result: Result<F, SequenceError>,
    ) -> LoadProgress<F> {
        if generation != self.generation {
            trace!("stale load for generation {generation} (current {})", self.generation);
            return LoadProgress::Stale;
        }
        let Some(slot) = self.slots.get_mut(index) else {
            return LoadProgress::Stale;
        };
        if !matches!(slot, Slot::Waiting) {
            return LoadProgress::Stale;
        }

        let first_loaded = index == 0 && result.is_ok();
        *slot = match result {
            Ok(frame) => Slot::Loaded(frame),
            Err(err) => {
                warn!("frame {index} failed to load: {err}");
                Slot::Failed
            }
        };
        self.pending -= 1;

        if self.pending > 0 {
            return if first_loaded {
                LoadProgress::FirstFrame
            } else {
                LoadProgress::Pending
            };
        }
        self.finish()
    }

    fn finish(&mut self) -> LoadProgress<F> {
        let failed: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| matches!(s, Slot::Failed).then_some(i))
            .collect();
        let slots = std::mem::take(&mut self.slots);
        if !failed.is_empty() {
            return LoadProgress::Failed(failed);
        }
        let frames = slots
            .into_iter()
            .filter_map(|s| match s {
                Slot::Loaded(f) => Some(f),
                _ => None,
            })
            .collect::<Vec<_>>();
        debug!("load generation {} ready: {} frames", self.generation, frames.len());
        LoadProgress::Ready(frames)
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    /// A frame of the batch in flight, if it has already arrived.
    pub fn frame(&self, index: usize) -> Option<&F> {
        match self.slots.get(index) {
            Some(Slot::Loaded(f)) => Some(f),
            _ => None,
        }
    }
}
