//! Theater Control
//!
//! Per-viewer binding between a control panel and the session authority.
//!
//! A [`ControlHandler`] owns one panel ([`ControlView`]) and drives one
//! [`Authority`](theater_core::Authority):
//!
//! - [`ControlHandler::update`] pulls status, loop, mute and volume once per
//!   UI tick
//! - gesture methods (`on_*`) become authority commands
//! - the authority pushes everything else through
//!   [`ControlCallbacks`](theater_core::ControlCallbacks)
//!
//! # Example
//!
//! ```rust
//! use theater_control::{format_duration, LockDisplay, ControlConfig, PlaceholderKind};
//!
//! assert_eq!(format_duration(3725.0), "01:02:05");
//!
//! let config = ControlConfig::default();
//! let lock = LockDisplay::resolve(true, false, "Host", &config);
//! assert_eq!(lock.kind, PlaceholderKind::MasterOnly);
//! assert!(lock.placeholder.contains("Host"));
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod fitter;
pub mod format;
pub mod handler;
pub mod lock;
pub mod view;

pub use config::{ControlColors, ControlConfig, UrlPrompts, MASTER_TOKEN};
pub use fitter::{aspect_fit, FitScale, ScreenFitter};
pub use format::format_duration;
pub use handler::ControlHandler;
pub use lock::{LockDisplay, PlaceholderKind};
pub use view::{ControlView, PanelState, PanelView};
