//! Hidden frame identities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opwatch_protocol::constants::{OP_FRAME_ID, PROMPT_NONE_FRAME_ID, RELAY_FRAME_ID};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameName {
    /// Same-origin frame hosting the probe/receive logic
    Relay,
    /// OP-hosted check-session frame
    OpCheckSession,
    /// Target of `prompt=none` navigations
    PromptNone,
}

/// Where a frame's element is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameParent {
    /// Body of the main document
    Document,
    /// Body of another frame's document
    Frame(FrameName),
}

impl FrameName {
    /// Creation order: the relay frame must exist before its children.
    pub const ALL: [FrameName; 3] = [
        FrameName::Relay,
        FrameName::OpCheckSession,
        FrameName::PromptNone,
    ];

    pub fn element_id(&self) -> &'static str {
        match self {
            FrameName::Relay => RELAY_FRAME_ID,
            FrameName::OpCheckSession => OP_FRAME_ID,
            FrameName::PromptNone => PROMPT_NONE_FRAME_ID,
        }
    }

    pub fn parent(&self) -> FrameParent {
        match self {
            FrameName::Relay => FrameParent::Document,
            FrameName::OpCheckSession | FrameName::PromptNone => {
                FrameParent::Frame(FrameName::Relay)
            }
        }
    }
}

impl std::fmt::Display for FrameName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.element_id())
    }
}

impl std::str::FromStr for FrameName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FrameName::ALL
            .into_iter()
            .find(|name| name.element_id() == s)
            .ok_or_else(|| format!("Unknown frame id: {}", s))
    }
}

/// A hidden frame known to the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameHandle {
    pub name: FrameName,
    /// Whether the element was created by us or found already attached
    pub adopted: bool,
    pub attached_at: DateTime<Utc>,
}

impl FrameHandle {
    pub fn new(name: FrameName, adopted: bool) -> Self {
        Self {
            name,
            adopted,
            attached_at: Utc::now(),
        }
    }

    pub fn element_id(&self) -> &'static str {
        self.name.element_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ids() {
        assert_eq!(FrameName::Relay.element_id(), "rpIFrame");
        assert_eq!(FrameName::OpCheckSession.element_id(), "opIFrame");
        assert_eq!(FrameName::PromptNone.element_id(), "promptNoneIFrame");
    }

    #[test]
    fn test_nesting() {
        assert_eq!(FrameName::Relay.parent(), FrameParent::Document);
        assert_eq!(
            FrameName::OpCheckSession.parent(),
            FrameParent::Frame(FrameName::Relay)
        );
        assert_eq!(
            FrameName::PromptNone.parent(),
            FrameParent::Frame(FrameName::Relay)
        );
    }

    #[test]
    fn test_parse_element_id() {
        assert_eq!("opIFrame".parse::<FrameName>(), Ok(FrameName::OpCheckSession));
        assert!("unknown".parse::<FrameName>().is_err());
    }
}
