//! The component as a host sees it: props in, frames rendered, `onLooped` out.
//!
//! `ImageSequenceView` composes the engine, a loader for asynchronously
//! fetched frames, a render sink and an optional loop callback. It holds no
//! widget state of its own.

use std::time::Duration;

use log::{debug, warn};

use crate::config::{frame_duration_for_fps, PlaybackConfig, SequenceProps};
use crate::engine::{sanitize_seconds, PlaybackEngine};
use crate::error::SequenceError;
use crate::loader::{LoadProgress, LoadRequest, SequenceLoader};
use crate::sinks::{LoopSink, RenderSink};
use crate::source::FrameSource;
use crate::state::TickOutcome;

pub struct ImageSequenceView<F> {
    engine: PlaybackEngine<F>,
    loader: SequenceLoader<F>,
    config: PlaybackConfig,
    images: Vec<String>,
    attached: bool,
    render: Box<dyn RenderSink<F>>,
    on_looped: Option<Box<dyn LoopSink>>,
}

impl<F> ImageSequenceView<F> {
    pub fn new(config: PlaybackConfig, render: impl RenderSink<F> + 'static) -> Self {
        Self {
            engine: PlaybackEngine::new(&config),
            loader: SequenceLoader::new(),
            config,
            images: Vec::new(),
            attached: false,
            render: Box::new(render),
            on_looped: None,
        }
    }

    pub fn engine(&self) -> &PlaybackEngine<F> {
        &self.engine
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[inline]
    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Register the `onLooped` handler, replacing any previous one.
    pub fn set_on_looped(&mut self, sink: impl LoopSink + 'static) {
        self.on_looped = Some(Box::new(sink));
    }

    pub fn clear_on_looped(&mut self) {
        self.on_looped = None;
    }

    /// Replace the images. Returns the loads the host must perform and report
    /// back through [`complete_load`](Self::complete_load).
    ///
    /// A malformed reference leaves the view with an empty, inert sequence.
    pub fn set_images<S: AsRef<str>>(&mut self, uris: &[S]) -> Vec<LoadRequest> {
        self.images = uris.iter().map(|u| u.as_ref().to_string()).collect();
        match FrameSource::parse_all(uris) {
            Ok(sources) if sources.is_empty() => {
                self.loader.cancel();
                self.engine.clear();
                Vec::new()
            }
            Ok(sources) => {
                let remote = sources.iter().filter(|s| s.is_remote()).count();
                debug!("loading {} images ({remote} remote)", sources.len());
                self.loader.begin(sources)
            }
            Err(err) => {
                warn!("image sequence disabled ({}): {err}", err.category());
                self.loader.cancel();
                self.engine.clear();
                Vec::new()
            }
        }
    }

    /// Report the outcome of one [`LoadRequest`].
    pub fn complete_load(
        &mut self,
        generation: u64,
        index: usize,
        result: Result<F, SequenceError>,
    ) {
        match self.loader.complete(generation, index, result) {
            LoadProgress::Stale | LoadProgress::Pending => {}
            LoadProgress::FirstFrame => {
                // The new batch owns the display from here on.
                self.engine.clear();
                if let Some(frame) = self.loader.frame(0) {
                    self.render.render(0, frame);
                }
            }
            LoadProgress::Ready(frames) => self.set_frames(frames),
            LoadProgress::Failed(failed) => {
                warn!(
                    "image sequence disabled: {} of {} frames failed to load",
                    failed.len(),
                    self.images.len()
                );
                self.engine.clear();
            }
        }
    }

    /// Install frames that are already in memory, bypassing the loader.
    pub fn set_frames(&mut self, frames: Vec<F>) {
        self.engine.set_sequence(frames, self.config.frame_duration());
        if let Some(frame) = self.engine.current_frame() {
            self.render.render(0, frame);
        }
        if self.attached {
            self.engine.start();
        }
    }

    pub fn set_frames_per_second(&mut self, fps: u32) {
        self.config.frames_per_second = fps;
        self.config.frame_duration_ms = None;
        self.engine.set_frame_duration(frame_duration_for_fps(fps));
    }

    pub fn set_frame_duration_ms(&mut self, ms: u32) {
        self.config.frame_duration_ms = Some(ms);
        self.engine
            .set_frame_duration(Duration::from_millis(u64::from(ms)));
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.config.looping = looping;
        self.engine.set_looping(looping);
    }

    /// Apply a full set of props. Returns load requests only when the images
    /// changed.
    ///
    /// Invalid timing is applied anyway (playback goes inert) and logged.
    pub fn apply_props(&mut self, props: &SequenceProps) -> Vec<LoadRequest> {
        if let Err(err) = props.playback.validate() {
            warn!("image sequence props rejected ({}): {err}", err.category());
        }
        let duration_changed = props.playback.frame_duration() != self.config.frame_duration();
        self.config.frames_per_second = props.playback.frames_per_second;
        self.config.frame_duration_ms = props.playback.frame_duration_ms;
        if duration_changed {
            self.engine.set_frame_duration(self.config.frame_duration());
        }
        self.set_loop(props.playback.looping);
        if props.images != self.images {
            self.set_images(props.images.as_slice())
        } else {
            Vec::new()
        }
    }

    /// The host made the view live: start playing whatever is loaded.
    pub fn attach(&mut self) {
        self.attached = true;
        self.engine.start();
        debug!("image sequence attached");
    }

    /// Stop playback and release frames and pending loads.
    pub fn detach(&mut self) {
        self.attached = false;
        self.engine.stop();
        self.engine.clear();
        self.loader.cancel();
        self.images.clear();
        debug!("image sequence detached");
    }

    pub fn start(&mut self) {
        self.engine.start();
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn tick(&mut self, elapsed: Duration) -> TickOutcome {
        let render = self.render.as_mut();
        match self.on_looped.as_deref_mut() {
            Some(looped) => self.engine.tick(elapsed, render, looped),
            None => self.engine.tick(elapsed, render, &mut || {}),
        }
    }

    pub fn tick_seconds(&mut self, secs: f64) -> TickOutcome {
        self.tick(sanitize_seconds(secs))
    }
}

impl<F> std::fmt::Debug for ImageSequenceView<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSequenceView")
            .field("state", &self.engine.snapshot())
            .field("config", &self.config)
            .field("images", &self.images)
            .field("attached", &self.attached)
            .field("loading", &self.loader.is_loading())
            .finish()
    }
}
