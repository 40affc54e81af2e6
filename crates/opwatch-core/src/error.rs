//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] opwatch_protocol::ProtocolError),

    #[error("Storage error: {0}")]
    Storage(#[from] opwatch_storage::StorageError),

    #[error("Frame error: {0}")]
    Frame(#[from] opwatch_frames::FrameError),

    #[error("Session error: {0}")]
    Session(#[from] opwatch_session::SessionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing configuration value: {0}")]
    MissingValue(&'static str),

    #[error("Invalid URL for {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
