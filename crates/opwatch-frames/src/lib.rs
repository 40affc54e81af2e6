//! opwatch Frames
//!
//! Session monitoring runs across three hidden iframes:
//! ```text
//! main document
//!   └── relay frame (rpIFrame, same origin as the app)
//!         ├── OP check-session frame (opIFrame)
//!         └── prompt-none frame (promptNoneIFrame)
//! ```
//! The browser itself (element creation, navigation, `postMessage`) is a
//! given platform reached through [`BrowserHost`].

mod error;
mod frame;
mod host;
mod registry;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::FrameError;
pub use frame::{FrameHandle, FrameName, FrameParent};
pub use host::{BrowserHost, InboundMessage, WindowTarget};
pub use registry::FrameRegistry;

pub type Result<T> = std::result::Result<T, FrameError>;
