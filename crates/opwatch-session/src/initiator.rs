//! Silent Reauth Initiator
//!
//! Navigates the prompt-none frame to a `prompt=none` authorization request.
//! The shared gate allows one request in flight; further attempts are
//! dropped until the redirect target releases it.

use std::sync::Arc;

use opwatch_frames::{BrowserHost, FrameName, WindowTarget};
use opwatch_protocol::{prompt_none_url, random_challenge, PromptNoneRequest, ResponseFlow};
use opwatch_storage::PromptNoneGate;

use crate::context::ClientSettings;
use crate::Result;

pub struct SilentReauthInitiator {
    host: Arc<dyn BrowserHost>,
    gate: Arc<dyn PromptNoneGate>,
}

impl SilentReauthInitiator {
    pub fn new(host: Arc<dyn BrowserHost>, gate: Arc<dyn PromptNoneGate>) -> Self {
        Self { host, gate }
    }

    /// Send a `prompt=none` request for `flow`.
    ///
    /// Returns `false` when the gate is held and the attempt was dropped.
    pub fn send(&self, client: &ClientSettings, flow: ResponseFlow) -> Result<bool> {
        if !self.gate.can_send_prompt_none_request() {
            tracing::debug!(
                client_id = %client.client_id,
                "prompt=none request already in flight, dropping"
            );
            return Ok(false);
        }

        self.gate.set_prompt_none_request_sent(true);

        if let Err(e) = self.navigate(client, flow) {
            // Nothing is in flight after all
            self.gate.set_prompt_none_request_sent(false);
            return Err(e);
        }

        tracing::debug!(
            client_id = %client.client_id,
            flow = ?flow,
            "Sent prompt=none request"
        );

        Ok(true)
    }

    fn navigate(&self, client: &ClientSettings, flow: ResponseFlow) -> Result<()> {
        let challenge = random_challenge();
        let url = prompt_none_url(&PromptNoneRequest {
            authorization_endpoint: &client.authorization_endpoint,
            client_id: &client.client_id,
            redirect_url: &client.redirect_url,
            state: flow.state(),
            code_challenge: &challenge,
        })?;

        self.host
            .navigate(WindowTarget::Frame(FrameName::PromptNone), url.as_str())?;

        Ok(())
    }
}

impl Clone for SilentReauthInitiator {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            gate: Arc::clone(&self.gate),
        }
    }
}
