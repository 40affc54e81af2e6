//! Cross-window messages
//!
//! ```text
//! relay frame ──ProbeMessage──▶ OP frame
//! relay frame ◀──OpReply─────── OP frame
//! prompt-none target ──RelayMessage──▶ embedding window
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::{OP_REPLY_ERROR, OP_REPLY_UNCHANGED};
use crate::Result;

/// Probe posted to the OP check-session frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeMessage {
    client_id: String,
    session_state: String,
}

impl ProbeMessage {
    /// Returns `None` when either part is empty; such a probe means nothing to the OP.
    pub fn new(client_id: &str, session_state: &str) -> Option<Self> {
        if client_id.is_empty() || session_state.is_empty() {
            return None;
        }

        Some(Self {
            client_id: client_id.to_string(),
            session_state: session_state.to_string(),
        })
    }

    pub fn payload(&self) -> String {
        format!("{} {}", self.client_id, self.session_state)
    }
}

impl std::fmt::Display for ProbeMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.client_id, self.session_state)
    }
}

/// Reply from the OP check-session frame.
///
/// The OP frame is untrusted: anything other than the two known literals
/// counts as a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpReply {
    Unchanged,
    Changed,
    Error,
}

impl OpReply {
    pub fn parse(data: &str) -> Self {
        match data {
            OP_REPLY_UNCHANGED => OpReply::Unchanged,
            OP_REPLY_ERROR => OpReply::Error,
            _ => OpReply::Changed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OpReply::Unchanged => "unchanged",
            OpReply::Changed => "changed",
            OpReply::Error => "error",
        }
    }
}

impl std::fmt::Display for OpReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a successful silent sign-in, relayed to the embedding window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationInfo {
    pub code: String,
    pub session_state: String,
}

/// Message posted from the prompt-none redirect target to its grandparent
/// during silent sign-in.
///
/// Wire format is `{"type": <kind>, "data": <T>}`; `data` is absent for
/// [`RelayMessage::SignedOut`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum RelayMessage<T> {
    #[serde(rename = "check_session_signed_in")]
    SignedIn(T),
    #[serde(rename = "check_session_signed_out")]
    SignedOut,
}

impl<T: Serialize> RelayMessage<T> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<T: DeserializeOwned> RelayMessage<T> {
    /// Parse a received payload; unknown kinds and malformed data are errors.
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}

impl<T> RelayMessage<T> {
    pub fn kind(&self) -> &'static str {
        match self {
            RelayMessage::SignedIn(_) => crate::constants::CHECK_SESSION_SIGNED_IN,
            RelayMessage::SignedOut => crate::constants::CHECK_SESSION_SIGNED_OUT,
        }
    }
}
