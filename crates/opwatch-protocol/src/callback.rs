//! Callback parameters of a `prompt=none` round trip
//!
//! The OP redirects the prompt-none frame back to the relying party with
//! `state`, and either `code` + `session_state` or an error. Only the two
//! protocol `state` markers identify a session-management response.

use url::Url;

use crate::constants::{SESSION_STATE, SILENT_REFRESH_STATE, SILENT_SIGN_IN_STATE};
use crate::Result;

/// Which flow a callback belongs to, decided by its `state` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFlow {
    /// Poller-driven refresh after a session change or on the refresh timer
    SilentRefresh,
    /// Out-of-band silent sign-in launched by an embedding window
    SilentSignIn,
}

impl ResponseFlow {
    pub fn from_state(state: &str) -> Option<Self> {
        match state {
            SILENT_REFRESH_STATE => Some(ResponseFlow::SilentRefresh),
            SILENT_SIGN_IN_STATE => Some(ResponseFlow::SilentSignIn),
            _ => None,
        }
    }

    /// The `state` marker sent with requests of this flow.
    pub fn state(&self) -> &'static str {
        match self {
            ResponseFlow::SilentRefresh => SILENT_REFRESH_STATE,
            ResponseFlow::SilentSignIn => SILENT_SIGN_IN_STATE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParameters {
    pub state: Option<String>,
    pub code: Option<String>,
    pub session_state: Option<String>,
}

impl CallbackParameters {
    /// Parse the query string of the redirect target's location.
    pub fn from_url(location: &str) -> Result<Self> {
        let url = Url::parse(location)?;
        Ok(Self::from_parsed(&url))
    }

    pub fn from_parsed(url: &Url) -> Self {
        let mut params = Self::default();

        // First occurrence wins, like URLSearchParams::get
        for (key, value) in url.query_pairs() {
            let slot = match key.as_ref() {
                "state" => &mut params.state,
                "code" => &mut params.code,
                SESSION_STATE => &mut params.session_state,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        params
    }

    /// `None` means "not a session-management response".
    pub fn flow(&self) -> Option<ResponseFlow> {
        self.state.as_deref().and_then(ResponseFlow::from_state)
    }

    /// The authorization code, if present and non-empty.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|code| !code.is_empty())
    }

    pub fn session_state(&self) -> Option<&str> {
        self.session_state.as_deref()
    }
}
