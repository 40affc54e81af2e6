//! Session Poller
//!
//! Posts the probe to the OP check-session frame and classifies replies.
//! The probe targets the exact origin of the check-session endpoint and only
//! replies from that origin are considered.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use opwatch_frames::{BrowserHost, FrameName, InboundMessage, WindowTarget};
use opwatch_protocol::{check_session_frame_url, origin_matches, origin_of, OpReply, ProbeMessage};

use crate::context::SessionContext;
use crate::error::SessionError;
use crate::state::PollerState;
use crate::Result;

/// Snapshot of the poller for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerStatus {
    pub state: PollerState,
    pub probes_sent: u64,
    pub last_probe_at: Option<DateTime<Utc>>,
    pub last_reply_at: Option<DateTime<Utc>>,
}

impl Default for PollerStatus {
    fn default() -> Self {
        Self {
            state: PollerState::Idle,
            probes_sent: 0,
            last_probe_at: None,
            last_reply_at: None,
        }
    }
}

pub struct SessionPoller {
    host: Arc<dyn BrowserHost>,
    status: Arc<RwLock<PollerStatus>>,
}

impl SessionPoller {
    pub fn new(host: Arc<dyn BrowserHost>) -> Self {
        Self {
            host,
            status: Arc::new(RwLock::new(PollerStatus::default())),
        }
    }

    pub fn status(&self) -> PollerStatus {
        self.status.read().clone()
    }

    pub fn state(&self) -> PollerState {
        self.status.read().state
    }

    /// Point the OP frame at the check-session endpoint.
    pub fn load_op_frame(&self, ctx: &SessionContext) -> Result<()> {
        let url = check_session_frame_url(
            &ctx.check_session_endpoint,
            &ctx.client.client_id,
            &ctx.client.redirect_url,
        )?;

        self.host.navigate(
            WindowTarget::Frame(FrameName::OpCheckSession),
            url.as_str(),
        )?;

        Ok(())
    }

    /// Post one probe. Returns `false` when the context cannot form a probe.
    pub fn probe(&self, ctx: &SessionContext) -> Result<bool> {
        let Some(probe) = ProbeMessage::new(&ctx.client.client_id, &ctx.session_state) else {
            return Ok(false);
        };

        let target_origin = origin_of(&ctx.check_session_endpoint)?;
        self.host.post_message(
            WindowTarget::Frame(FrameName::OpCheckSession),
            &probe.payload(),
            &target_origin,
        )?;

        let mut status = self.status.write();
        Self::transition(&mut status, PollerState::Polling, &ctx.id)?;
        status.probes_sent += 1;
        status.last_probe_at = Some(Utc::now());

        Ok(true)
    }

    /// Classify a message delivered to the relay frame.
    ///
    /// `None` for messages that are not an OP reply to us: wrong origin, or
    /// no probe outstanding.
    pub fn classify(&self, ctx: &SessionContext, message: &InboundMessage) -> Option<OpReply> {
        if !origin_matches(&ctx.check_session_endpoint, &message.origin) {
            tracing::warn!(
                context_id = %ctx.id,
                origin = %message.origin,
                "Discarding message from unexpected origin"
            );
            return None;
        }

        let reply = OpReply::parse(&message.data);

        let mut status = self.status.write();
        if let Err(e) = Self::transition(&mut status, PollerState::from_reply(reply), &ctx.id) {
            tracing::debug!(context_id = %ctx.id, "Discarding OP reply: {}", e);
            return None;
        }
        status.last_reply_at = Some(Utc::now());

        Some(reply)
    }

    /// Back to idle; counters are kept for diagnostics.
    pub fn reset(&self) {
        self.status.write().state = PollerState::Idle;
    }

    fn transition(status: &mut PollerStatus, to: PollerState, context_id: &str) -> Result<()> {
        if !status.state.can_transition_to(to) {
            return Err(SessionError::InvalidTransition {
                from: status.state.to_string(),
                to: to.to_string(),
            });
        }

        tracing::debug!(
            context_id = %context_id,
            from = %status.state,
            to = %to,
            "Poller state transition"
        );

        status.state = to;
        Ok(())
    }
}

impl Clone for SessionPoller {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            status: Arc::clone(&self.status),
        }
    }
}
