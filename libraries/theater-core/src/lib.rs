//! Theater Core
//!
//! Shared types and the authority protocol for a multi-viewer playback
//! session.
//!
//! A session has one canonical player, the *authority*, which this crate
//! only describes. Two components are built around it:
//!
//! - `theater-backend` drives the interchangeable playback backends and
//!   forwards their lifecycle events ([`PlayerEvent`]) to the authority
//! - `theater-control` renders authority state for one viewer and turns
//!   gestures into [`Authority`] commands, receiving pushes through
//!   [`ControlCallbacks`]
//!
//! # Example
//!
//! ```rust
//! use theater_core::{AuthoritySnapshot, Participant, PlayerId, PlayerMode, SessionContext};
//!
//! let host = Participant::new(PlayerId::new(1), "Host");
//! let ctx = SessionContext::new(host.clone());
//!
//! let snapshot = AuthoritySnapshot::new(host);
//! assert!(ctx.is_local(&snapshot.owner));
//! assert_eq!(snapshot.player_mode, PlayerMode::Video);
//! ```

#![forbid(unsafe_code)]

pub mod authority;
pub mod error;
pub mod events;
pub mod session;
pub mod types;

pub use authority::{Authority, ControlCallbacks};
pub use error::{CoreError, Result};
pub use events::{PlayerEvent, VideoError, VideoEventReceiver};
pub use session::SessionContext;
pub use types::{
    AuthoritySnapshot, Color, Participant, PlayerId, PlayerMode, Resolution, SessionId, VideoUrl,
};
