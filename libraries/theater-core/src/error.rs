/// Core error types for Theater
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while setting up session plumbing
#[derive(Error, Debug)]
pub enum CoreError {
    /// A value could not be parsed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Referenced participant is not part of the session
    #[error("Participant not found: {0}")]
    ParticipantNotFound(crate::types::PlayerId),
}

impl CoreError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
