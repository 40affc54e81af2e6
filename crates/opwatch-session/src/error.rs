//! Session monitoring error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Frame error: {0}")]
    Frame(#[from] opwatch_frames::FrameError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] opwatch_protocol::ProtocolError),

    #[error("Invalid poller transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("No Tokio runtime available to schedule session work")]
    NoRuntime,
}
