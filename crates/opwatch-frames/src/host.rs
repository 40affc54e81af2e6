//! Browser host interface
//!
//! Everything the session monitor needs from the page it runs in. A host
//! instance is bound to one browsing context; [`WindowTarget::Current`] is
//! that context and the other targets are resolved relative to it.

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::frame::FrameName;
use crate::Result;

/// A window reachable from the current browsing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowTarget {
    Current,
    Parent,
    /// `parent.parent`: the main window when running inside the prompt-none frame
    Grandparent,
    Top,
    /// Content window of one of the hidden frames
    Frame(FrameName),
}

impl std::fmt::Display for WindowTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowTarget::Current => write!(f, "current"),
            WindowTarget::Parent => write!(f, "parent"),
            WindowTarget::Grandparent => write!(f, "grandparent"),
            WindowTarget::Top => write!(f, "top"),
            WindowTarget::Frame(name) => write!(f, "frame:{}", name),
        }
    }
}

/// A `message` event as delivered to a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Origin of the sender, as reported by the browser
    pub origin: String,
    pub data: String,
}

impl InboundMessage {
    pub fn new(origin: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            data: data.into(),
        }
    }
}

#[async_trait]
pub trait BrowserHost: Send + Sync {
    /// Whether the frame's element is attached under its parent document.
    fn frame_exists(&self, frame: FrameName) -> bool;

    /// Attach an invisible iframe with the frame's element id under its parent.
    fn create_hidden_frame(&self, frame: FrameName) -> Result<()>;

    /// Set the location of a window (or `src` of a frame).
    fn navigate(&self, target: WindowTarget, url: &str) -> Result<()>;

    /// `postMessage` to a window, restricted to `target_origin` (never `*`).
    fn post_message(&self, target: WindowTarget, data: &str, target_origin: &str) -> Result<()>;

    /// Serialized origin of a window.
    fn origin(&self, target: WindowTarget) -> Result<String>;

    /// Full URL of the current browsing context.
    fn location(&self) -> Result<String>;

    /// Stream of `message` events delivered to a window.
    fn subscribe(&self, target: WindowTarget) -> Result<UnboundedReceiver<InboundMessage>>;

    /// Resolve once a navigation started on `target` has taken effect.
    async fn settle(&self, target: WindowTarget);
}
