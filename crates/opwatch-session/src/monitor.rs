//! Session Monitor
//!
//! Owns everything one signed-in tab needs: the hidden frames, the poller,
//! the two schedules and the OP-reply listener. `initialize` replaces the
//! whole session context; `reset` tears it down again.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use opwatch_frames::{FrameHandle, FrameName, FrameRegistry, InboundMessage, WindowTarget};
use opwatch_protocol::{OpReply, ResponseFlow};

use crate::collaborators::{sign_out_and_redirect, Collaborators, SessionStateSetter};
use crate::context::SessionContext;
use crate::error::SessionError;
use crate::initiator::SilentReauthInitiator;
use crate::interpreter::ResponseInterpreter;
use crate::poller::{PollerStatus, SessionPoller};
use crate::schedule::{IntervalController, Schedule};
use crate::Result;

pub struct SessionMonitor {
    collaborators: Collaborators,
    registry: FrameRegistry,
    poller: SessionPoller,
    initiator: SilentReauthInitiator,
    interpreter: ResponseInterpreter,
    schedules: IntervalController,
    listener: Mutex<Option<JoinHandle<()>>>,
    context: RwLock<Option<Arc<SessionContext>>>,
}

impl SessionMonitor {
    /// Attach the hidden frames and build an idle monitor.
    pub async fn attach(collaborators: Collaborators, relay_document: &str) -> Result<Self> {
        let registry =
            FrameRegistry::new(Arc::clone(&collaborators.host)).with_relay_document(relay_document);
        registry.attach().await?;

        Ok(Self {
            poller: SessionPoller::new(Arc::clone(&collaborators.host)),
            initiator: SilentReauthInitiator::new(
                Arc::clone(&collaborators.host),
                Arc::clone(&collaborators.gate),
            ),
            interpreter: ResponseInterpreter::new(collaborators.clone()),
            schedules: IntervalController::new(),
            listener: Mutex::new(None),
            context: RwLock::new(None),
            registry,
            collaborators,
        })
    }

    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.interpreter =
            ResponseInterpreter::new(self.collaborators.clone()).with_settle_timeout(timeout);
        self
    }

    /// Start monitoring `ctx`, replacing any previous context.
    ///
    /// Polling starts only with a positive poll interval and a complete
    /// context; the forced refresh only with a positive refresh interval.
    /// Must be called from within a Tokio runtime. On error the monitor is
    /// left reset, with no schedule, listener or context.
    pub fn initialize(&self, ctx: SessionContext) -> Result<()> {
        self.reset();

        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let ctx = Arc::new(ctx);

        if let Err(e) = self.start(&runtime, &ctx) {
            tracing::error!(context_id = %ctx.id, "Session monitor failed to start: {}", e);
            self.reset();
            return Err(e);
        }

        *self.context.write() = Some(Arc::clone(&ctx));

        tracing::info!(
            context_id = %ctx.id,
            client_id = %ctx.client.client_id,
            poll_interval_secs = ctx.poll_interval_secs,
            session_refresh_interval_secs = ctx.session_refresh_interval_secs,
            "Session monitor initialized"
        );

        Ok(())
    }

    fn start(&self, runtime: &Handle, ctx: &Arc<SessionContext>) -> Result<()> {
        let worker = Worker {
            ctx: Arc::clone(ctx),
            poller: self.poller.clone(),
            initiator: self.initiator.clone(),
            collaborators: self.collaborators.clone(),
        };

        match ctx.poll_interval() {
            Some(period) if ctx.can_poll() => {
                // Subscribed before probing so no reply is missed; the
                // listener only runs once the first probe went out
                let replies = self
                    .collaborators
                    .host
                    .subscribe(WindowTarget::Frame(FrameName::Relay))?;

                self.poller.load_op_frame(ctx)?;
                self.poller.probe(ctx)?;

                *self.listener.lock() = Some(runtime.spawn(worker.clone().listen(replies)));

                let tick = worker.clone();
                self.schedules
                    .start(Schedule::CheckSession, period, move || tick.probe())?;
            }
            Some(_) => {
                tracing::debug!(
                    context_id = %ctx.id,
                    "Session context incomplete, not polling"
                );
            }
            None => {}
        }

        if let Some(period) = ctx.session_refresh_interval() {
            let tick = worker;
            self.schedules
                .start(Schedule::SessionRefresh, period, move || tick.refresh())?;
        }

        Ok(())
    }

    /// Stop both schedules and the listener and drop the context.
    pub fn reset(&self) {
        self.schedules.reset();
        if let Some(listener) = self.listener.lock().take() {
            listener.abort();
        }
        self.poller.reset();

        if let Some(ctx) = self.context.write().take() {
            tracing::info!(context_id = %ctx.id, "Session monitor reset");
        }
    }

    pub async fn receive_prompt_none_response(
        &self,
        setter: Option<&dyn SessionStateSetter>,
    ) -> Result<bool> {
        self.interpreter.receive_prompt_none_response(setter).await
    }

    pub fn status(&self) -> PollerStatus {
        self.poller.status()
    }

    pub fn context(&self) -> Option<SessionContext> {
        self.context.read().as_deref().cloned()
    }

    pub fn is_scheduled(&self, schedule: Schedule) -> bool {
        self.schedules.is_active(schedule)
    }

    pub fn is_listening(&self) -> bool {
        self.listener
            .lock()
            .as_ref()
            .is_some_and(|listener| !listener.is_finished())
    }

    pub fn frames(&self) -> Vec<FrameHandle> {
        self.registry.handles()
    }
}

impl Drop for SessionMonitor {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.get_mut().take() {
            listener.abort();
        }
    }
}

/// What the schedules and the listener run with.
#[derive(Clone)]
struct Worker {
    ctx: Arc<SessionContext>,
    poller: SessionPoller,
    initiator: SilentReauthInitiator,
    collaborators: Collaborators,
}

impl Worker {
    fn probe(&self) {
        if let Err(e) = self.poller.probe(&self.ctx) {
            tracing::error!(context_id = %self.ctx.id, "Check-session probe failed: {}", e);
        }
    }

    fn refresh(&self) {
        if let Err(e) = self.initiator.send(&self.ctx.client, ResponseFlow::SilentRefresh) {
            tracing::error!(context_id = %self.ctx.id, "Silent refresh failed: {}", e);
        }
    }

    async fn listen(self, mut replies: UnboundedReceiver<InboundMessage>) {
        while let Some(message) = replies.recv().await {
            self.handle(&message).await;
        }
    }

    async fn handle(&self, message: &InboundMessage) {
        let Some(reply) = self.poller.classify(&self.ctx, message) else {
            return;
        };

        tracing::debug!(context_id = %self.ctx.id, reply = reply.as_str(), "OP reply");

        match reply {
            OpReply::Unchanged => {}
            OpReply::Changed => self.refresh(),
            OpReply::Error => {
                let result = sign_out_and_redirect(
                    self.collaborators.host.as_ref(),
                    self.collaborators.sign_out.as_ref(),
                    WindowTarget::Top,
                )
                .await;

                if let Err(e) = result {
                    tracing::error!(context_id = %self.ctx.id, "Sign-out redirect failed: {}", e);
                }
            }
        }
    }
}
