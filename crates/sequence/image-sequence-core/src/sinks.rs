//! Collaborators the engine reports to.
//!
//! Both sinks run synchronously inside a tick on the scheduling thread and
//! must not block.

use crossbeam_channel::{Sender, TrySendError};
use log::debug;
use serde::{Deserialize, Serialize};

/// Receives the frame that should currently be on screen.
pub trait RenderSink<F> {
    fn render(&mut self, index: usize, frame: &F);
}

impl<F, T> RenderSink<F> for T
where
    T: FnMut(usize, &F),
{
    fn render(&mut self, index: usize, frame: &F) {
        self(index, frame)
    }
}

/// Receives the zero-argument "loop completed" signal.
pub trait LoopSink {
    fn on_looped(&mut self);
}

impl<T> LoopSink for T
where
    T: FnMut(),
{
    fn on_looped(&mut self) {
        self()
    }
}

/// Message sent through a [`ChannelLoopSink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Looped;

/// Forwards loop notifications into a channel.
///
/// A full or disconnected channel drops the notification.
#[derive(Clone, Debug)]
pub struct ChannelLoopSink {
    tx: Sender<Looped>,
}

impl ChannelLoopSink {
    pub fn new(tx: Sender<Looped>) -> Self {
        Self { tx }
    }
}

impl LoopSink for ChannelLoopSink {
    fn on_looped(&mut self) {
        match self.tx.try_send(Looped) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => debug!("loop notification dropped: channel full"),
            Err(TrySendError::Disconnected(_)) => {
                debug!("loop notification dropped: receiver gone")
            }
        }
    }
}
