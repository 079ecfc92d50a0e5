/// Backend adapter errors
use theater_core::PlayerMode;
use thiserror::Error;

/// Result type for adapter setup
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors raised while setting up the adapter
///
/// Playback commands never return these; backend failures during playback
/// travel as `PlayerEvent::Error`.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No backend installed for the requested mode
    #[error("No backend installed for {0} mode")]
    MissingBackend(PlayerMode),
}
