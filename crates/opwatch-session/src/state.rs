//! Session Poller State Machine
//!
//! ```text
//! Idle
//!   ↓ initialize (first probe)
//! Polling ──reply──▶ Unchanged | Changed | Errored
//!   ▲                      │
//!   └──── next probe ──────┘
//! any ── reset ──▶ Idle
//! ```

use serde::{Deserialize, Serialize};

use opwatch_protocol::OpReply;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollerState {
    /// Not monitoring
    Idle,
    /// Probe posted, waiting for the OP frame
    Polling,
    /// OP reported the session state is current
    Unchanged,
    /// OP reported a different session state
    Changed,
    /// OP could not evaluate the probe
    Errored,
}

impl PollerState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: PollerState) -> bool {
        match (self, target) {
            // reset is always allowed
            (_, PollerState::Idle) => true,
            // Every probe starts a new round, including the first one
            (_, PollerState::Polling) => true,
            // Replies need a probe; late replies answer the most recent one
            (PollerState::Idle, _) => false,
            (_, PollerState::Unchanged | PollerState::Changed | PollerState::Errored) => true,
        }
    }

    pub fn from_reply(reply: OpReply) -> Self {
        match reply {
            OpReply::Unchanged => PollerState::Unchanged,
            OpReply::Changed => PollerState::Changed,
            OpReply::Error => PollerState::Errored,
        }
    }

    pub fn is_monitoring(&self) -> bool {
        !matches!(self, PollerState::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PollerState::Idle => "idle",
            PollerState::Polling => "polling",
            PollerState::Unchanged => "unchanged",
            PollerState::Changed => "changed",
            PollerState::Errored => "errored",
        }
    }
}

impl std::fmt::Display for PollerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PollerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(PollerState::Idle),
            "polling" => Ok(PollerState::Polling),
            "unchanged" => Ok(PollerState::Unchanged),
            "changed" => Ok(PollerState::Changed),
            "errored" => Ok(PollerState::Errored),
            _ => Err(format!("Unknown poller state: {}", s)),
        }
    }
}
