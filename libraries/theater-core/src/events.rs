//! Backend lifecycle events
//!
//! Backends report what happened to the media through these events. The
//! backend adapter forwards them verbatim to the authority, which decides
//! ordering, deduplication and what (if anything) viewers get to see.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason a backend failed to load or play media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoError {
    /// Failure with no more specific reason
    Unknown,

    /// The URL could not be resolved to playable media
    InvalidUrl,

    /// The host refused to serve the media
    AccessDenied,

    /// The backend itself failed
    PlayerError,

    /// Too many loads in a short window
    RateLimited,
}

impl VideoError {
    /// Message suitable for the status line
    pub fn message(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown error",
            Self::InvalidUrl => "Invalid URL",
            Self::AccessDenied => "Unsafe URL or access denied",
            Self::PlayerError => "Video player error",
            Self::RateLimited => "Rate limited, try again in a few seconds",
        }
    }

    /// Whether retrying the same URL may succeed
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimited | Self::PlayerError | Self::Unknown)
    }
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Lifecycle callback raised by a playback backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Media loaded and can start
    Ready,

    /// Playback started from the beginning
    Start,

    /// Playback resumed
    Play,

    Pause,
    Stop,

    /// Playback wrapped around while looping
    Loop,

    /// Reached the end of the media
    End,

    /// Load or playback failed
    Error(VideoError),
}

impl PlayerEvent {
    /// Short name for logs
    pub fn name(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Start => "start",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Loop => "loop",
            Self::End => "end",
            Self::Error(_) => "error",
        }
    }
}

/// Receives backend lifecycle events
///
/// Implemented by the authority (final consumer) and by the backend adapter
/// (which relays to the authority).
pub trait VideoEventReceiver: Send + Sync {
    fn on_video_event(&self, event: PlayerEvent);
}
