//! External collaborators
//!
//! The OAuth client owns sign-out and token storage; this crate only asks it
//! for a sign-out URL and hands it new session states.

use async_trait::async_trait;
use std::sync::Arc;

use opwatch_frames::{BrowserHost, WindowTarget};
use opwatch_storage::{PromptNoneGate, SilentSignInFlag};

use crate::Result;

/// Produces the URL that completes a full sign-out at the OP.
#[async_trait]
pub trait SignOutProvider: Send + Sync {
    async fn sign_out(&self) -> anyhow::Result<String>;
}

/// Receives the session state of a completed silent refresh.
#[async_trait]
pub trait SessionStateSetter: Send + Sync {
    async fn set_session_state(&self, session_state: Option<String>);
}

#[async_trait]
impl<F> SessionStateSetter for F
where
    F: Fn(Option<String>) + Send + Sync,
{
    async fn set_session_state(&self, session_state: Option<String>) {
        self(session_state)
    }
}

/// Everything a browsing context needs to take part in session management.
#[derive(Clone)]
pub struct Collaborators {
    pub host: Arc<dyn BrowserHost>,
    pub gate: Arc<dyn PromptNoneGate>,
    pub silent_sign_in: Arc<dyn SilentSignInFlag>,
    pub sign_out: Arc<dyn SignOutProvider>,
}

/// The single "give up and force re-login" path.
///
/// Returns `Ok(false)` when the provider failed and nothing was navigated.
pub async fn sign_out_and_redirect(
    host: &dyn BrowserHost,
    provider: &dyn SignOutProvider,
    target: WindowTarget,
) -> Result<bool> {
    let url = match provider.sign_out().await {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(target = %target, "Sign-out provider failed: {:#}", e);
            return Ok(false);
        }
    };

    tracing::warn!(target = %target, "Session ended at the OP, redirecting to sign-out");
    host.navigate(target, &url)?;

    Ok(true)
}
