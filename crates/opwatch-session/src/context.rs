//! Session context
//!
//! One per signed-in tab. Set by `initialize`, read by the poller and the
//! initiator, dropped on `reset`.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Registration of the relying party at the OP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub client_id: String,
    pub authorization_endpoint: String,
    pub redirect_url: String,
}

impl ClientSettings {
    pub fn new(
        client_id: impl Into<String>,
        authorization_endpoint: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            authorization_endpoint: authorization_endpoint.into(),
            redirect_url: redirect_url.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// Identifies this monitoring context in logs
    pub id: String,
    pub client: ClientSettings,
    pub check_session_endpoint: String,
    /// Opaque session state issued by the OP at login
    pub session_state: String,
    /// `<= 0` disables polling
    pub poll_interval_secs: i64,
    /// `<= 0` disables the forced silent refresh
    pub session_refresh_interval_secs: i64,
}

impl SessionContext {
    pub fn new(
        client: ClientSettings,
        check_session_endpoint: impl Into<String>,
        session_state: impl Into<String>,
        poll_interval_secs: i64,
        session_refresh_interval_secs: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client,
            check_session_endpoint: check_session_endpoint.into(),
            session_state: session_state.into(),
            poll_interval_secs,
            session_refresh_interval_secs,
        }
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        positive_secs(self.poll_interval_secs)
    }

    pub fn session_refresh_interval(&self) -> Option<Duration> {
        positive_secs(self.session_refresh_interval_secs)
    }

    /// Whether polling may start: every value a probe depends on is present.
    pub fn can_poll(&self) -> bool {
        !self.client.client_id.is_empty()
            && !self.check_session_endpoint.is_empty()
            && !self.client.redirect_url.is_empty()
            && !self.session_state.is_empty()
    }
}

fn positive_secs(secs: i64) -> Option<Duration> {
    u64::try_from(secs)
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
