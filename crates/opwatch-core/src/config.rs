//! Session watch configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use opwatch_protocol::constants::BLANK_DOCUMENT;
use opwatch_session::{ClientSettings, SessionContext};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OAuth client id registered at the OP
    pub client_id: String,
    /// OP check-session iframe URL
    pub check_session_endpoint: String,
    pub authorization_endpoint: String,
    /// Redirect URI, same origin as the app
    pub redirect_url: String,
    /// Check-session poll period; `<= 0` disables polling
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: i64,
    /// Forced silent refresh period; `<= 0` disables it
    #[serde(default = "default_session_refresh_interval")]
    pub session_refresh_interval_secs: i64,
    /// Static same-origin document loaded into the relay frame
    #[serde(default = "default_relay_document")]
    pub relay_document_url: String,
    #[serde(default = "default_silent_sign_in_timeout")]
    pub silent_sign_in_timeout_secs: u64,
    #[serde(default = "default_navigation_settle_timeout")]
    pub navigation_settle_timeout_ms: u64,
}

fn default_poll_interval() -> i64 {
    3
}

fn default_session_refresh_interval() -> i64 {
    300
}

fn default_relay_document() -> String {
    BLANK_DOCUMENT.to_string()
}

fn default_silent_sign_in_timeout() -> u64 {
    10
}

fn default_navigation_settle_timeout() -> u64 {
    3000
}

impl Config {
    pub fn new(
        client_id: impl Into<String>,
        check_session_endpoint: impl Into<String>,
        authorization_endpoint: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            check_session_endpoint: check_session_endpoint.into(),
            authorization_endpoint: authorization_endpoint.into(),
            redirect_url: redirect_url.into(),
            poll_interval_secs: default_poll_interval(),
            session_refresh_interval_secs: default_session_refresh_interval(),
            relay_document_url: default_relay_document(),
            silent_sign_in_timeout_secs: default_silent_sign_in_timeout(),
            navigation_settle_timeout_ms: default_navigation_settle_timeout(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject configurations that could never produce a valid request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.is_empty() {
            return Err(ConfigError::MissingValue("client_id"));
        }

        for (field, value) in [
            ("check_session_endpoint", &self.check_session_endpoint),
            ("authorization_endpoint", &self.authorization_endpoint),
            ("redirect_url", &self.redirect_url),
            ("relay_document_url", &self.relay_document_url),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingValue(field));
            }
            Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
                field,
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }

    pub fn client(&self) -> ClientSettings {
        ClientSettings::new(
            self.client_id.as_str(),
            self.authorization_endpoint.as_str(),
            self.redirect_url.as_str(),
        )
    }

    /// Monitoring context for the session state issued at login.
    pub fn session_context(&self, session_state: &str) -> SessionContext {
        SessionContext::new(
            self.client(),
            self.check_session_endpoint.as_str(),
            session_state,
            self.poll_interval_secs,
            self.session_refresh_interval_secs,
        )
    }

    pub fn silent_sign_in_timeout(&self) -> Duration {
        Duration::from_secs(self.silent_sign_in_timeout_secs)
    }

    pub fn navigation_settle_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_settle_timeout_ms)
    }
}
