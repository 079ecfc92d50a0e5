//! Theater Backend Adapter
//!
//! One command surface over two interchangeable playback backends.
//!
//! The authority never talks to a backend directly. It drives a
//! [`VideoPlayerManager`], which:
//! - forwards play/pause/stop/seek/URL commands to the backend selected by
//!   the current [`PlayerMode`](theater_core::PlayerMode)
//! - rebinds the visible surface to that backend's texture after every
//!   mutating command and on every mode switch
//! - fans volume out to every registered [`AudioSink`]
//! - relays backend lifecycle events to the authority unchanged
//!
//! # Example
//!
//! ```rust
//! use theater_backend::{
//!     BackendConfig, EventEmitter, PropertyBlock, RenderSurface, TextureHandle, VideoBackend,
//!     VideoPlayerManager,
//! };
//! use theater_core::{PlayerEvent, PlayerMode, VideoUrl};
//!
//! struct Screen(PropertyBlock);
//!
//! impl RenderSurface for Screen {
//!     fn property_block(&self) -> PropertyBlock {
//!         self.0.clone()
//!     }
//!
//!     fn set_property_block(&mut self, block: PropertyBlock) {
//!         self.0 = block;
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Silent {
//!     events: Option<EventEmitter>,
//! }
//!
//! impl VideoBackend for Silent {
//!     fn name(&self) -> &str {
//!         "silent"
//!     }
//!     fn play(&mut self) {
//!         if let Some(events) = &self.events {
//!             events.emit(PlayerEvent::Play);
//!         }
//!     }
//!     fn pause(&mut self) {}
//!     fn stop(&mut self) {}
//!     fn set_time(&mut self, _seconds: f32) {}
//!     fn set_url(&mut self, _url: &VideoUrl) {}
//!     fn texture(&self) -> Option<TextureHandle> {
//!         Some(TextureHandle::new(1))
//!     }
//!     fn attach(&mut self, events: EventEmitter) {
//!         self.events = Some(events);
//!     }
//! }
//!
//! let manager = VideoPlayerManager::new(BackendConfig::default(), Box::new(Screen(PropertyBlock::new())))
//!     .with_backend(PlayerMode::Video, Box::new(Silent::default()));
//!
//! manager.start().unwrap();
//! manager.play_video();
//! assert_eq!(manager.bound_texture(), Some(TextureHandle::new(1)));
//! ```

#![forbid(unsafe_code)]

mod backend;
pub mod config;
mod error;
mod manager;
mod output;

pub use backend::{BackendEvent, EventEmitter, VideoBackend};
pub use config::BackendConfig;
pub use error::{BackendError, Result};
pub use manager::VideoPlayerManager;
pub use output::{AudioSink, OutputBinding, PropertyBlock, RenderSurface, TextureHandle};
