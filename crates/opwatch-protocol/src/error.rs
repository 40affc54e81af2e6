//! Protocol error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL has no tuple origin: {0}")]
    OpaqueOrigin(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<url::ParseError> for ProtocolError {
    fn from(err: url::ParseError) -> Self {
        ProtocolError::InvalidUrl(err.to_string())
    }
}
