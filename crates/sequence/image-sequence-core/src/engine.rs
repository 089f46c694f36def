//! Engine: frame list ownership and tick-driven advancement.
//!
//! Methods:
//! - set_sequence, set_frame_duration, set_looping (configuration)
//! - start, stop (control)
//! - advance / tick (time math → render sink → loop sink)
//!
//! Time is kept as `Duration` so `k * frame_duration` lands exactly on a frame
//! boundary regardless of how the host slices its ticks.

use std::time::Duration;

use log::{debug, trace, warn};

use crate::config::PlaybackConfig;
use crate::sinks::{LoopSink, RenderSink};
use crate::state::{PlaybackState, TickOutcome};

const NANOS_PER_SEC: u128 = 1_000_000_000;

fn duration_from_nanos(nanos: u128) -> Duration {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}

/// Convert host-supplied seconds into a duration, rounded to the nearest
/// nanosecond so `0.7` is exactly 700ms. Negative, NaN and infinite values
/// become zero.
pub fn sanitize_seconds(secs: f64) -> Duration {
    if !secs.is_finite() || secs <= 0.0 {
        return Duration::ZERO;
    }
    // `as` saturates on overflow
    duration_from_nanos((secs * NANOS_PER_SEC as f64).round() as u128)
}

/// Plays an ordered list of frames in a loop.
///
/// The engine assumes exclusive access; hosts that tick from several threads
/// must wrap it themselves.
#[derive(Clone, Debug)]
pub struct PlaybackEngine<F> {
    frames: Vec<F>,
    frame_duration: Duration,
    looping: bool,
    current: usize,
    elapsed: Duration,
    playing: bool,
    finished: bool,
    loops_completed: u64,
}

impl<F> Default for PlaybackEngine<F> {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}

impl<F> PlaybackEngine<F> {
    /// Create an empty engine using the timing and looping of `cfg`.
    pub fn new(cfg: &PlaybackConfig) -> Self {
        Self {
            frames: Vec::new(),
            frame_duration: cfg.frame_duration(),
            looping: cfg.looping,
            current: 0,
            elapsed: Duration::ZERO,
            playing: false,
            finished: false,
            loops_completed: 0,
        }
    }

    /// Replace the frames and per-frame duration.
    ///
    /// Rewinds to frame 0 and clears the loop counter; leaves the playing flag
    /// alone so a playing engine keeps playing the new frames.
    pub fn set_sequence(&mut self, frames: Vec<F>, frame_duration: Duration) {
        if !frames.is_empty() && frame_duration.is_zero() {
            warn!(
                "image sequence of {} frames has zero frame duration; playback is inert",
                frames.len()
            );
        }
        debug!(
            "sequence replaced: {} frames, {:?} per frame",
            frames.len(),
            frame_duration
        );
        self.frames = frames;
        self.frame_duration = frame_duration;
        self.current = 0;
        self.elapsed = Duration::ZERO;
        self.finished = false;
        self.loops_completed = 0;
    }

    /// Drop all frames. Playback becomes a no-op until a new sequence arrives.
    pub fn clear(&mut self) {
        let duration = self.frame_duration;
        self.set_sequence(Vec::new(), duration);
    }

    /// Takes effect on the next tick; time already spent in the current frame
    /// is not rescaled, so that frame may show briefly shorter or longer.
    pub fn set_frame_duration(&mut self, frame_duration: Duration) {
        if !self.frames.is_empty() && frame_duration.is_zero() {
            warn!("frame duration set to zero; playback is inert");
        }
        self.frame_duration = frame_duration;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn start(&mut self) {
        if self.playing {
            return;
        }
        if self.frames.is_empty() {
            trace!("start ignored: empty sequence");
            return;
        }
        if self.finished {
            self.current = 0;
            self.elapsed = Duration::ZERO;
            self.finished = false;
        }
        self.playing = true;
        debug!("playback started at frame {}", self.current);
    }

    /// Pause in place; a later `start` resumes mid-frame.
    pub fn stop(&mut self) {
        if self.playing {
            self.playing = false;
            debug!("playback stopped at frame {}", self.current);
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Empty, or non-empty with a zero frame duration.
    #[inline]
    pub fn is_inert(&self) -> bool {
        self.frames.is_empty() || self.frame_duration.is_zero()
    }

    #[inline]
    pub fn looping(&self) -> bool {
        self.looping
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.frames.is_empty()).then_some(self.current)
    }

    pub fn current_frame(&self) -> Option<&F> {
        self.frames.get(self.current)
    }

    #[inline]
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    #[inline]
    pub fn elapsed_in_frame(&self) -> Duration {
        self.elapsed
    }

    /// Loop boundaries crossed since the last `set_sequence`.
    #[inline]
    pub fn loops_completed(&self) -> u64 {
        self.loops_completed
    }

    pub fn snapshot(&self) -> PlaybackState {
        PlaybackState {
            current_index: self.current_index(),
            elapsed_in_frame: self.elapsed,
            frame_duration: self.frame_duration,
            is_playing: self.playing,
            looping: self.looping,
            finished: self.finished,
            loops_completed: self.loops_completed,
            frame_count: self.frames.len(),
        }
    }

    /// Advance by `elapsed` without touching any sink.
    ///
    /// However many frame or loop boundaries are crossed, the outcome carries
    /// only the final index and a single `looped` flag.
    pub fn advance(&mut self, elapsed: Duration) -> TickOutcome {
        if !self.playing || self.is_inert() || elapsed.is_zero() {
            return TickOutcome::default();
        }

        let len = self.frames.len() as u128;
        let step = self.frame_duration.as_nanos();
        let total = self.elapsed.as_nanos() + elapsed.as_nanos();
        let steps = total / step;
        let remainder = total % step;

        if steps == 0 {
            self.elapsed = duration_from_nanos(remainder);
            return TickOutcome::default();
        }

        let mut outcome = TickOutcome::default();
        let from = self.current as u128;

        if self.looping {
            let target = from + steps;
            let wraps = target / len;
            self.current = (target % len) as usize;
            self.elapsed = duration_from_nanos(remainder);
            outcome.frame = Some(self.current);
            if wraps > 0 {
                let wraps = u64::try_from(wraps).unwrap_or(u64::MAX);
                self.loops_completed = self.loops_completed.saturating_add(wraps);
                outcome.looped = true;
                outcome.loops = wraps;
            }
        } else {
            let remaining = len - 1 - from;
            if steps <= remaining {
                self.current = (from + steps) as usize;
                self.elapsed = duration_from_nanos(remainder);
                outcome.frame = Some(self.current);
            } else {
                // The last frame has run its full duration.
                self.current = self.frames.len() - 1;
                self.elapsed = Duration::ZERO;
                self.playing = false;
                self.finished = true;
                self.loops_completed = self.loops_completed.saturating_add(1);
                if remaining > 0 {
                    outcome.frame = Some(self.current);
                }
                outcome.looped = true;
                outcome.loops = 1;
                outcome.finished = true;
                debug!("one-shot playback finished on frame {}", self.current);
            }
        }

        trace!(
            "advanced {} steps to frame {} (loops {})",
            steps,
            self.current,
            outcome.loops
        );
        outcome
    }

    /// Float-seconds variant of [`advance`](Self::advance).
    pub fn advance_seconds(&mut self, secs: f64) -> TickOutcome {
        self.advance(sanitize_seconds(secs))
    }

    /// Advance and report to the sinks: render first, then the loop signal,
    /// each at most once.
    pub fn tick<R, L>(&mut self, elapsed: Duration, render: &mut R, loops: &mut L) -> TickOutcome
    where
        R: RenderSink<F> + ?Sized,
        L: LoopSink + ?Sized,
    {
        let outcome = self.advance(elapsed);
        if let Some(index) = outcome.frame {
            if let Some(frame) = self.frames.get(index) {
                render.render(index, frame);
            }
        }
        if outcome.looped {
            loops.on_looped();
        }
        outcome
    }

    pub fn tick_seconds<R, L>(&mut self, secs: f64, render: &mut R, loops: &mut L) -> TickOutcome
    where
        R: RenderSink<F> + ?Sized,
        L: LoopSink + ?Sized,
    {
        self.tick(sanitize_seconds(secs), render, loops)
    }
}
