//! Silent sign-in launcher
//!
//! The top-level side of the silent-sign-in flow: sends a `prompt=none`
//! request carrying the silent-sign-in marker through the prompt-none frame
//! and waits for the redirect target to relay the outcome back.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use opwatch_frames::{FrameRegistry, InboundMessage, WindowTarget};
use opwatch_protocol::{AuthorizationInfo, RelayMessage, ResponseFlow};

use crate::collaborators::Collaborators;
use crate::context::ClientSettings;
use crate::initiator::SilentReauthInitiator;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SilentSignInOutcome {
    /// The OP still has a session; the code can be exchanged for tokens
    SignedIn(AuthorizationInfo),
    SignedOut,
    /// No relay message arrived in time
    TimedOut,
    /// Another `prompt=none` request holds the gate
    Busy,
}

pub struct SilentSignIn {
    collaborators: Collaborators,
    client: ClientSettings,
    relay_document: String,
    timeout: Duration,
}

impl SilentSignIn {
    pub fn new(
        collaborators: Collaborators,
        client: ClientSettings,
        relay_document: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            collaborators,
            client,
            relay_document: relay_document.into(),
            timeout,
        }
    }

    pub async fn try_sign_in(&self) -> Result<SilentSignInOutcome> {
        let host = &self.collaborators.host;
        let flag = &self.collaborators.silent_sign_in;

        FrameRegistry::new(Arc::clone(host))
            .with_relay_document(self.relay_document.as_str())
            .attach()
            .await?;

        let own_origin = host.origin(WindowTarget::Current)?;
        let mut inbox = host.subscribe(WindowTarget::Current)?;

        // The flag may belong to the request holding the gate; leave it alone
        if !self.collaborators.gate.can_send_prompt_none_request() {
            return Ok(SilentSignInOutcome::Busy);
        }

        let previous = flag.is_initializing_silent_sign_in();
        flag.set_initializing_silent_sign_in(true);

        let initiator =
            SilentReauthInitiator::new(Arc::clone(host), Arc::clone(&self.collaborators.gate));
        match initiator.send(&self.client, ResponseFlow::SilentSignIn) {
            Ok(true) => {}
            Ok(false) => {
                flag.set_initializing_silent_sign_in(previous);
                return Ok(SilentSignInOutcome::Busy);
            }
            Err(e) => {
                flag.set_initializing_silent_sign_in(previous);
                return Err(e);
            }
        }

        let outcome = match tokio::time::timeout(
            self.timeout,
            Self::await_relay(&mut inbox, &own_origin),
        )
        .await
        {
            Ok(Some(outcome)) => outcome,
            Ok(None) | Err(_) => {
                // Nobody will answer this request any more
                self.collaborators.gate.set_prompt_none_request_sent(false);
                flag.set_initializing_silent_sign_in(false);
                SilentSignInOutcome::TimedOut
            }
        };

        tracing::info!(
            client_id = %self.client.client_id,
            outcome = outcome.as_str(),
            "Silent sign-in finished"
        );

        Ok(outcome)
    }

    /// First relay message from our own origin; `None` once the host closes the stream.
    async fn await_relay(
        inbox: &mut UnboundedReceiver<InboundMessage>,
        own_origin: &str,
    ) -> Option<SilentSignInOutcome> {
        while let Some(message) = inbox.recv().await {
            if message.origin != own_origin {
                tracing::warn!(origin = %message.origin, "Discarding relay message from foreign origin");
                continue;
            }

            match RelayMessage::<AuthorizationInfo>::from_json(&message.data) {
                Ok(RelayMessage::SignedIn(info)) => return Some(SilentSignInOutcome::SignedIn(info)),
                Ok(RelayMessage::SignedOut) => return Some(SilentSignInOutcome::SignedOut),
                Err(e) => {
                    tracing::debug!("Ignoring non-relay message: {}", e);
                }
            }
        }

        None
    }
}

impl SilentSignInOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SilentSignInOutcome::SignedIn(_) => "signed_in",
            SilentSignInOutcome::SignedOut => "signed_out",
            SilentSignInOutcome::TimedOut => "timed_out",
            SilentSignInOutcome::Busy => "busy",
        }
    }
}
