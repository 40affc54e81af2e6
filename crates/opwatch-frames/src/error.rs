//! Frame and host error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Frame not found: {0}")]
    NotFound(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("postMessage failed: {0}")]
    PostMessage(String),

    #[error("Window not reachable: {0}")]
    Unreachable(String),
}
