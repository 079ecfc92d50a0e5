/// Backend selection and media descriptors
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the two interchangeable playback backends is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerMode {
    /// Primary backend, plays seekable video files
    #[default]
    Video,

    /// Secondary backend, plays live streams
    Stream,
}

impl PlayerMode {
    /// True for the primary (video file) backend
    pub fn is_video(self) -> bool {
        matches!(self, Self::Video)
    }

    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            Self::Video => Self::Stream,
            Self::Stream => Self::Video,
        }
    }

    /// Convert to string representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Stream => "stream",
        }
    }
}

impl fmt::Display for PlayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "stream" => Ok(Self::Stream),
            other => Err(CoreError::invalid_input(format!(
                "unknown player mode '{other}', expected 'video' or 'stream'"
            ))),
        }
    }
}

/// URL text entered by a participant
///
/// Validation belongs to the authority; this only carries the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoUrl(String);

impl VideoUrl {
    /// Wrap URL text
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The cleared value of an input field
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether no URL was entered
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VideoUrl {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

/// Pixel dimensions reported by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, `None` for a degenerate resolution
    pub fn aspect(self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}
