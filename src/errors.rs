// src/errors.rs

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum ColloquyError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging error: {0}")]
    Logging(String),
}

pub type ColloquyResult<T> = Result<T, ColloquyError>;

impl ColloquyError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        ColloquyError::Config(msg.into())
    }

    pub fn transport_error(msg: impl Into<String>) -> Self {
        ColloquyError::Transport(msg.into())
    }
}

impl From<reqwest::Error> for ColloquyError {
    fn from(e: reqwest::Error) -> Self {
        ColloquyError::Transport(e.to_string())
    }
}

impl From<flexi_logger::FlexiLoggerError> for ColloquyError {
    fn from(e: flexi_logger::FlexiLoggerError) -> Self {
        ColloquyError::Logging(e.to_string())
    }
}
