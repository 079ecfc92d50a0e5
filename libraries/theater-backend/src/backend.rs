//! Playback backend abstraction
//!
//! A session can play through one of two interchangeable backends, selected
//! by [`PlayerMode`]. Each backend decodes and renders on its own and reports
//! lifecycle events through the [`EventEmitter`] it was attached to.

use crate::output::TextureHandle;
use crossbeam_channel::Sender;
use theater_core::{PlayerEvent, PlayerMode, VideoUrl};
use tracing::warn;

/// One decode/render pipeline
#[cfg_attr(test, mockall::automock)]
pub trait VideoBackend: Send {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    fn play(&mut self);

    fn pause(&mut self);

    fn stop(&mut self);

    /// Seek to `seconds` from the start of the media
    fn set_time(&mut self, seconds: f32);

    /// Load a new URL
    fn set_url(&mut self, url: &VideoUrl);

    /// Texture the backend currently renders into
    fn texture(&self) -> Option<TextureHandle>;

    /// Hand the backend the emitter it reports lifecycle events through
    fn attach(&mut self, events: EventEmitter);
}

/// Lifecycle event tagged with the backend that raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendEvent {
    pub mode: PlayerMode,
    pub event: PlayerEvent,
}

/// Sending half of the adapter's event queue, bound to one backend
#[derive(Debug, Clone)]
pub struct EventEmitter {
    mode: PlayerMode,
    tx: Sender<BackendEvent>,
}

impl EventEmitter {
    pub(crate) fn new(mode: PlayerMode, tx: Sender<BackendEvent>) -> Self {
        Self { mode, tx }
    }

    /// Mode of the backend this emitter belongs to
    pub fn mode(&self) -> PlayerMode {
        self.mode
    }

    /// Queue an event for the adapter
    pub fn emit(&self, event: PlayerEvent) {
        if self
            .tx
            .send(BackendEvent {
                mode: self.mode,
                event,
            })
            .is_err()
        {
            warn!(mode = %self.mode, event = event.name(), "Adapter gone, dropping backend event");
        }
    }
}

/// One optional backend per mode
#[derive(Default)]
pub(crate) struct BackendSet {
    video: Option<Box<dyn VideoBackend>>,
    stream: Option<Box<dyn VideoBackend>>,
}

impl BackendSet {
    fn slot(&mut self, mode: PlayerMode) -> &mut Option<Box<dyn VideoBackend>> {
        match mode {
            PlayerMode::Video => &mut self.video,
            PlayerMode::Stream => &mut self.stream,
        }
    }

    /// Install a backend, returning the one it replaces
    pub(crate) fn insert(
        &mut self,
        mode: PlayerMode,
        backend: Box<dyn VideoBackend>,
    ) -> Option<Box<dyn VideoBackend>> {
        self.slot(mode).replace(backend)
    }

    pub(crate) fn get_mut(&mut self, mode: PlayerMode) -> Option<&mut (dyn VideoBackend + 'static)> {
        self.slot(mode).as_deref_mut()
    }

    pub(crate) fn contains(&self, mode: PlayerMode) -> bool {
        match mode {
            PlayerMode::Video => self.video.is_some(),
            PlayerMode::Stream => self.stream.is_some(),
        }
    }
}
