//! Theater Demo
//!
//! Headless simulator for a shared playback session. A [`Room`] plays the
//! authority, two [`SimulatedBackend`]s stand in for the video file and
//! stream players, and every participant gets a control panel bound through
//! `theater-control`.

#![forbid(unsafe_code)]

pub mod authority;
pub mod backends;
pub mod config;
pub mod error;
pub mod session;

pub use authority::{Room, Seat};
pub use backends::{HeadlessSurface, MeterSink, SimulatedBackend};
pub use config::{DemoConfig, SessionSettings};
pub use error::{DemoError, Result};
pub use session::{Simulation, Viewer};
