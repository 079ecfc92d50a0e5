//! Simulated backends and outputs
//!
//! Stand-ins for a real decoder, screen and speaker. They keep just enough
//! state to produce the lifecycle events and textures a real backend would.

use std::sync::{Arc, Mutex, PoisonError};
use theater_backend::{AudioSink, EventEmitter, PropertyBlock, RenderSurface, TextureHandle, VideoBackend};
use theater_core::{PlayerEvent, VideoError, VideoUrl};
use tracing::debug;

/// Backend that "decodes" any http(s) URL instantly
pub struct SimulatedBackend {
    name: String,
    events: Option<EventEmitter>,
    url: Option<VideoUrl>,
    texture: Option<TextureHandle>,
    next_texture: u64,
    position: f32,
    playing: bool,
}

impl SimulatedBackend {
    /// `texture_base` keeps texture ids of different backends apart
    pub fn new(name: impl Into<String>, texture_base: u64) -> Self {
        Self {
            name: name.into(),
            events: None,
            url: None,
            texture: None,
            next_texture: texture_base,
            position: 0.0,
            playing: false,
        }
    }

    fn emit(&self, event: PlayerEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }

    fn is_playable(url: &VideoUrl) -> bool {
        let url = url.as_str().trim();
        url.starts_with("http://") || url.starts_with("https://")
    }
}

impl VideoBackend for SimulatedBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn play(&mut self) {
        if self.url.is_none() {
            debug!(backend = %self.name, "Nothing loaded, ignoring play");
            return;
        }

        if self.position <= 0.0 {
            self.emit(PlayerEvent::Start);
        }
        self.playing = true;
        self.emit(PlayerEvent::Play);
    }

    fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            self.emit(PlayerEvent::Pause);
        }
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position = 0.0;
        self.emit(PlayerEvent::Stop);
    }

    fn set_time(&mut self, seconds: f32) {
        self.position = seconds.max(0.0);
    }

    fn set_url(&mut self, url: &VideoUrl) {
        self.playing = false;
        self.position = 0.0;

        if !Self::is_playable(url) {
            self.url = None;
            self.texture = None;
            self.emit(PlayerEvent::Error(VideoError::InvalidUrl));
            return;
        }

        self.next_texture += 1;
        self.texture = Some(TextureHandle::new(self.next_texture));
        self.url = Some(url.clone());
        self.emit(PlayerEvent::Ready);
    }

    fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    fn attach(&mut self, events: EventEmitter) {
        self.events = Some(events);
    }
}

/// Screen whose property block can be inspected from outside
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    block: Arc<Mutex<PropertyBlock>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture bound to `property`
    pub fn texture(&self, property: &str) -> Option<TextureHandle> {
        self.block
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .texture(property)
    }
}

impl RenderSurface for HeadlessSurface {
    fn property_block(&self) -> PropertyBlock {
        self.block
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_property_block(&mut self, block: PropertyBlock) {
        *self.block.lock().unwrap_or_else(PoisonError::into_inner) = block;
    }
}

/// Speaker that remembers the last volume it was given
#[derive(Debug, Clone, Default)]
pub struct MeterSink {
    level: Arc<Mutex<f32>>,
}

impl MeterSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> f32 {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AudioSink for MeterSink {
    fn set_volume(&mut self, volume: f32) {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner) = volume;
    }
}
