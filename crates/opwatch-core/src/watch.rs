//! Session watch
//!
//! Wires a validated [`Config`] and the integrator's collaborators into the
//! monitor, the response interpreter and the silent-sign-in launcher.
//! Frames are attached lazily, so the redirect target can use the same
//! facade to interpret its callback without creating any.

use tokio::sync::OnceCell;

use opwatch_session::{
    Collaborators, PollerStatus, ResponseInterpreter, SessionContext, SessionMonitor,
    SessionStateSetter, SilentSignIn, SilentSignInOutcome,
};

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

pub struct SessionWatch {
    config: Config,
    collaborators: Collaborators,
    monitor: OnceCell<SessionMonitor>,
}

impl SessionWatch {
    pub fn new(config: Config, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            collaborators,
            monitor: OnceCell::new(),
        })
    }

    /// Start monitoring the session state issued at login.
    pub async fn initialize(&self, session_state: &str) -> Result<()> {
        let monitor = self.monitor().await?;
        monitor.initialize(self.config.session_context(session_state))?;
        Ok(())
    }

    /// Stop monitoring. Does nothing before the first `initialize`.
    pub fn reset(&self) {
        if let Some(monitor) = self.monitor.get() {
            monitor.reset();
        }
    }

    /// Interpret the callback at the current location of the redirect target.
    pub async fn receive_prompt_none_response(
        &self,
        setter: Option<&dyn SessionStateSetter>,
    ) -> Result<bool> {
        let handled = ResponseInterpreter::new(self.collaborators.clone())
            .with_settle_timeout(self.config.navigation_settle_timeout())
            .receive_prompt_none_response(setter)
            .await?;
        Ok(handled)
    }

    pub async fn try_silent_sign_in(&self) -> Result<SilentSignInOutcome> {
        let launcher = SilentSignIn::new(
            self.collaborators.clone(),
            self.config.client(),
            self.config.relay_document_url.as_str(),
            self.config.silent_sign_in_timeout(),
        );
        Ok(launcher.try_sign_in().await?)
    }

    pub fn status(&self) -> PollerStatus {
        self.monitor
            .get()
            .map(SessionMonitor::status)
            .unwrap_or_default()
    }

    pub fn context(&self) -> Option<SessionContext> {
        self.monitor.get().and_then(SessionMonitor::context)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    async fn monitor(&self) -> Result<&SessionMonitor> {
        self.monitor
            .get_or_try_init(|| async {
                let monitor =
                    SessionMonitor::attach(self.collaborators.clone(), &self.config.relay_document_url)
                        .await?;
                Ok::<_, CoreError>(
                    monitor.with_settle_timeout(self.config.navigation_settle_timeout()),
                )
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use async_trait::async_trait;
    use opwatch_frames::testing::RecordingHost;
    use opwatch_frames::{FrameName, WindowTarget};
    use opwatch_session::{PollerState, SignOutProvider};
    use opwatch_storage::{PromptNoneGate, SessionStorage};
    use std::sync::Arc;
    use std::time::Duration;

    const OP_FRAME: WindowTarget = WindowTarget::Frame(FrameName::OpCheckSession);

    struct SignOut;

    #[async_trait]
    impl SignOutProvider for SignOut {
        async fn sign_out(&self) -> anyhow::Result<String> {
            Ok("https://op.example.com/logout".to_string())
        }
    }

    fn config() -> Config {
        Config::new(
            "client-1",
            "https://op.example.com/oidc/checksession",
            "https://op.example.com/oauth2/authorize",
            "https://app.example.com/callback",
        )
    }

    fn collaborators(host: &Arc<RecordingHost>, storage: &SessionStorage) -> Collaborators {
        Collaborators {
            host: host.clone(),
            gate: Arc::new(storage.clone()),
            silent_sign_in: Arc::new(storage.clone()),
            sign_out: Arc::new(SignOut),
        }
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let host = Arc::new(RecordingHost::new("https://app.example.com/"));
        let mut config = config();
        config.client_id.clear();

        let result = SessionWatch::new(config, collaborators(&host, &SessionStorage::new()));
        assert!(matches!(
            result,
            Err(CoreError::Config(ConfigError::MissingValue("client_id")))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_and_reset() {
        let host = Arc::new(RecordingHost::new("https://app.example.com/"));
        let watch = SessionWatch::new(config(), collaborators(&host, &SessionStorage::new())).unwrap();

        assert_eq!(watch.status().state, PollerState::Idle);
        watch.reset();

        watch.initialize("session-state-1").await.unwrap();
        assert_eq!(host.created_frames().len(), 3);
        assert_eq!(
            host.messages_to(OP_FRAME),
            vec![(
                "client-1 session-state-1".to_string(),
                "https://op.example.com".to_string()
            )]
        );
        assert_eq!(watch.status().state, PollerState::Polling);
        assert_eq!(
            watch.context().map(|ctx| ctx.session_state),
            Some("session-state-1".to_string())
        );

        // Re-initializing reuses the attached frames
        watch.initialize("session-state-2").await.unwrap();
        assert_eq!(host.created_frames().len(), 3);

        watch.reset();
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(host.messages_to(OP_FRAME).len(), 2);
        assert!(watch.context().is_none());
    }

    #[tokio::test]
    async fn test_callback_without_frames() {
        let host = Arc::new(RecordingHost::new(
            "https://app.example.com/callback?state=Y2hlY2tTZXNzaW9u&code=abc&session_state=s2",
        ));
        let storage = SessionStorage::new();
        storage.set_prompt_none_request_sent(true);
        let watch = SessionWatch::new(config(), collaborators(&host, &storage)).unwrap();

        assert!(watch.receive_prompt_none_response(None).await.unwrap());
        assert!(storage.can_send_prompt_none_request());
        assert!(host.created_frames().is_empty());
    }

    #[tokio::test]
    async fn test_silent_sign_in_busy() {
        let host = Arc::new(RecordingHost::new("https://app.example.com/"));
        host.set_origin(WindowTarget::Current, "https://app.example.com");
        let storage = SessionStorage::new();
        storage.set_prompt_none_request_sent(true);
        let watch = SessionWatch::new(config(), collaborators(&host, &storage)).unwrap();

        assert_eq!(
            watch.try_silent_sign_in().await.unwrap(),
            SilentSignInOutcome::Busy
        );
    }
}
