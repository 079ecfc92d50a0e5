/// Demo error types
use theater_backend::BackendError;
use theater_core::CoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Session error: {0}")]
    Session(#[from] CoreError),
}
