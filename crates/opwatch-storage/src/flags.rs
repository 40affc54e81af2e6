//! Cross-frame flags
//!
//! The prompt-none gate is a mutual-exclusion flag without queueing: while it
//! is held, a second silent request is dropped, not deferred.

use opwatch_protocol::constants::{INITIALIZED_SILENT_SIGN_IN, PROMPT_NONE_REQUEST_SENT};

use crate::session_storage::SessionStorage;

/// Gate guarding against a second `prompt=none` request while one is in flight.
pub trait PromptNoneGate: Send + Sync {
    fn can_send_prompt_none_request(&self) -> bool;

    fn set_prompt_none_request_sent(&self, sent: bool);
}

/// Flag set while a silent sign-in is being initialized by an embedding window.
pub trait SilentSignInFlag: Send + Sync {
    fn is_initializing_silent_sign_in(&self) -> bool;

    fn set_initializing_silent_sign_in(&self, initializing: bool);
}

impl PromptNoneGate for SessionStorage {
    fn can_send_prompt_none_request(&self) -> bool {
        match self.get_json::<bool>(PROMPT_NONE_REQUEST_SENT) {
            Ok(sent) => !sent.unwrap_or(false),
            Err(e) => {
                // Unreadable entry; treat as released
                tracing::debug!("Ignoring malformed prompt-none gate entry: {}", e);
                true
            }
        }
    }

    fn set_prompt_none_request_sent(&self, sent: bool) {
        if let Err(e) = self.set_json(PROMPT_NONE_REQUEST_SENT, &sent) {
            tracing::warn!("Failed to store prompt-none gate: {}", e);
        }
    }
}

impl SilentSignInFlag for SessionStorage {
    fn is_initializing_silent_sign_in(&self) -> bool {
        self.get_json::<bool>(INITIALIZED_SILENT_SIGN_IN)
            .ok()
            .flatten()
            .unwrap_or(false)
    }

    fn set_initializing_silent_sign_in(&self, initializing: bool) {
        if let Err(e) = self.set_json(INITIALIZED_SILENT_SIGN_IN, &initializing) {
            tracing::warn!("Failed to store silent sign-in flag: {}", e);
        }
    }
}
