//! Response Interpreter
//!
//! Runs inside the prompt-none frame once the OP has redirected it back to
//! the relying party. Every recognized response ends the same way: the frame
//! is parked on a blank document so the callback URL is never processed twice.

use std::time::Duration;

use opwatch_frames::WindowTarget;
use opwatch_protocol::constants::BLANK_DOCUMENT;
use opwatch_protocol::{AuthorizationInfo, CallbackParameters, RelayMessage, ResponseFlow};

use crate::collaborators::{sign_out_and_redirect, Collaborators, SessionStateSetter};
use crate::Result;

const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(3);

pub struct ResponseInterpreter {
    collaborators: Collaborators,
    settle_timeout: Duration,
}

impl ResponseInterpreter {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            settle_timeout: DEFAULT_SETTLE_TIMEOUT,
        }
    }

    /// Upper bound on waiting for the blank navigation to take effect.
    pub fn with_settle_timeout(mut self, timeout: Duration) -> Self {
        self.settle_timeout = timeout;
        self
    }

    /// Handle the callback at the current location.
    ///
    /// `Ok(false)` means the location is not a session-management response
    /// and nothing was touched; `Ok(true)` means it was fully handled.
    pub async fn receive_prompt_none_response(
        &self,
        setter: Option<&dyn SessionStateSetter>,
    ) -> Result<bool> {
        let location = self.collaborators.host.location()?;

        let params = match CallbackParameters::from_url(&location) {
            Ok(params) => params,
            Err(e) => {
                tracing::debug!("Location is not a callback URL: {}", e);
                return Ok(false);
            }
        };

        let Some(flow) = params.flow() else {
            return Ok(false);
        };

        match flow {
            ResponseFlow::SilentRefresh => self.complete_refresh(&params, setter).await?,
            ResponseFlow::SilentSignIn => self.relay_sign_in(&params)?,
        }

        self.blank().await?;

        Ok(true)
    }

    async fn complete_refresh(
        &self,
        params: &CallbackParameters,
        setter: Option<&dyn SessionStateSetter>,
    ) -> Result<()> {
        if params.code().is_some() {
            if let Some(setter) = setter {
                setter
                    .set_session_state(params.session_state().map(str::to_string))
                    .await;
            }
            self.collaborators.gate.set_prompt_none_request_sent(false);

            tracing::info!("Silent refresh completed");
            return Ok(());
        }

        // The OP could not re-authenticate without interaction
        self.collaborators.gate.set_prompt_none_request_sent(false);
        sign_out_and_redirect(
            self.collaborators.host.as_ref(),
            self.collaborators.sign_out.as_ref(),
            WindowTarget::Grandparent,
        )
        .await?;

        Ok(())
    }

    fn relay_sign_in(&self, params: &CallbackParameters) -> Result<()> {
        self.collaborators
            .silent_sign_in
            .set_initializing_silent_sign_in(false);

        let message = match params.code() {
            Some(code) => RelayMessage::SignedIn(AuthorizationInfo {
                code: code.to_string(),
                session_state: params.session_state().unwrap_or_default().to_string(),
            }),
            None => RelayMessage::SignedOut,
        };

        let host = &self.collaborators.host;
        let origin = host.origin(WindowTarget::Grandparent)?;
        host.post_message(WindowTarget::Grandparent, &message.to_json()?, &origin)?;

        self.collaborators.gate.set_prompt_none_request_sent(false);

        tracing::info!(kind = message.kind(), "Relayed silent sign-in result");

        Ok(())
    }

    async fn blank(&self) -> Result<()> {
        let host = &self.collaborators.host;
        host.navigate(WindowTarget::Current, BLANK_DOCUMENT)?;

        if tokio::time::timeout(self.settle_timeout, host.settle(WindowTarget::Current))
            .await
            .is_err()
        {
            tracing::debug!(
                timeout_ms = self.settle_timeout.as_millis() as u64,
                "Blank navigation did not settle in time"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, APP_ORIGIN, SIGN_OUT_URL};
    use opwatch_frames::testing::HostEvent;
    use opwatch_protocol::constants::{SILENT_REFRESH_STATE, SILENT_SIGN_IN_STATE};
    use opwatch_storage::{PromptNoneGate, SilentSignInFlag};
    use parking_lot::Mutex;

    fn callback(query: &str) -> String {
        format!("https://app.example.com/callback?{}", query)
    }

    #[tokio::test]
    async fn test_refresh_with_code_sets_session_state() {
        let fx = fixture(&callback(&format!(
            "state={}&code=abc123&session_state=xyz",
            SILENT_REFRESH_STATE
        )));
        fx.storage.set_prompt_none_request_sent(true);

        let seen = Mutex::new(Vec::new());
        let setter = |state: Option<String>| seen.lock().push(state);

        let interpreter = ResponseInterpreter::new(fx.collaborators.clone());
        let handled = interpreter
            .receive_prompt_none_response(Some(&setter))
            .await
            .unwrap();

        assert!(handled);
        assert_eq!(*seen.lock(), vec![Some("xyz".to_string())]);
        assert!(fx.storage.can_send_prompt_none_request());
        assert_eq!(fx.sign_out.calls(), 0);

        // Parked on a blank document, then waited for it
        let events = fx.host.events();
        assert_eq!(
            events,
            vec![
                HostEvent::Navigated {
                    target: WindowTarget::Current,
                    url: "about:blank".to_string()
                },
                HostEvent::Settled(WindowTarget::Current),
            ]
        );
    }

    #[tokio::test]
    async fn test_refresh_without_setter() {
        let fx = fixture(&callback(&format!(
            "state={}&code=abc123&session_state=xyz",
            SILENT_REFRESH_STATE
        )));
        fx.storage.set_prompt_none_request_sent(true);

        let interpreter = ResponseInterpreter::new(fx.collaborators.clone());
        assert!(interpreter.receive_prompt_none_response(None).await.unwrap());
        assert!(fx.storage.can_send_prompt_none_request());
    }

    #[tokio::test]
    async fn test_refresh_without_code_signs_out() {
        let fx = fixture(&callback(&format!(
            "state={}&error=login_required",
            SILENT_REFRESH_STATE
        )));
        fx.storage.set_prompt_none_request_sent(true);

        let interpreter = ResponseInterpreter::new(fx.collaborators.clone());
        let handled = interpreter.receive_prompt_none_response(None).await.unwrap();

        assert!(handled);
        assert_eq!(fx.sign_out.calls(), 1);
        assert_eq!(
            fx.host.navigations_of(WindowTarget::Grandparent),
            vec![SIGN_OUT_URL.to_string()]
        );
        assert_eq!(
            fx.host.navigations_of(WindowTarget::Current),
            vec!["about:blank".to_string()]
        );
        assert!(fx.storage.can_send_prompt_none_request());
    }

    #[tokio::test]
    async fn test_silent_sign_in_success_relays_code() {
        let fx = fixture(&callback(
            "state=Y2hlY2tTZXNzaW9uU2lsZW50bHk%3D&code=abc&session_state=s2",
        ));
        fx.host.set_origin(WindowTarget::Grandparent, APP_ORIGIN);
        fx.storage.set_prompt_none_request_sent(true);
        fx.storage.set_initializing_silent_sign_in(true);

        let interpreter = ResponseInterpreter::new(fx.collaborators.clone());
        assert!(interpreter.receive_prompt_none_response(None).await.unwrap());

        let messages = fx.host.messages_to(WindowTarget::Grandparent);
        assert_eq!(messages.len(), 1);
        let (data, target_origin) = &messages[0];
        assert_eq!(target_origin, APP_ORIGIN);

        let message: RelayMessage<AuthorizationInfo> = RelayMessage::from_json(data).unwrap();
        assert_eq!(
            message,
            RelayMessage::SignedIn(AuthorizationInfo {
                code: "abc".to_string(),
                session_state: "s2".to_string(),
            })
        );

        assert!(!fx.storage.is_initializing_silent_sign_in());
        assert!(fx.storage.can_send_prompt_none_request());
        assert_eq!(fx.sign_out.calls(), 0);
        assert_eq!(
            fx.host.navigations_of(WindowTarget::Current),
            vec!["about:blank".to_string()]
        );
    }

    #[tokio::test]
    async fn test_silent_sign_in_without_code_relays_signed_out() {
        let fx = fixture(&format!(
            "https://app.example.com/callback?state={}&error=login_required",
            url::form_urlencoded::byte_serialize(SILENT_SIGN_IN_STATE.as_bytes())
                .collect::<String>()
        ));
        fx.host.set_origin(WindowTarget::Grandparent, APP_ORIGIN);
        fx.storage.set_initializing_silent_sign_in(true);

        let interpreter = ResponseInterpreter::new(fx.collaborators.clone());
        assert!(interpreter.receive_prompt_none_response(None).await.unwrap());

        let messages = fx.host.messages_to(WindowTarget::Grandparent);
        assert_eq!(
            messages,
            vec![(
                r#"{"type":"check_session_signed_out"}"#.to_string(),
                APP_ORIGIN.to_string()
            )]
        );
        assert!(!fx.storage.is_initializing_silent_sign_in());
        // Silent sign-in never forces sign-out
        assert_eq!(fx.sign_out.calls(), 0);
        assert!(fx.host.navigations_of(WindowTarget::Grandparent).is_empty());
    }

    #[tokio::test]
    async fn test_silent_sign_in_without_session_state() {
        let fx = fixture(&callback("state=Y2hlY2tTZXNzaW9uU2lsZW50bHk%3D&code=abc"));
        fx.host.set_origin(WindowTarget::Grandparent, APP_ORIGIN);

        let interpreter = ResponseInterpreter::new(fx.collaborators.clone());
        assert!(interpreter.receive_prompt_none_response(None).await.unwrap());

        let (data, _) = &fx.host.messages_to(WindowTarget::Grandparent)[0];
        let message: RelayMessage<AuthorizationInfo> = RelayMessage::from_json(data).unwrap();
        assert_eq!(
            message,
            RelayMessage::SignedIn(AuthorizationInfo {
                code: "abc".to_string(),
                session_state: String::new(),
            })
        );
    }

    #[tokio::test]
    async fn test_foreign_state_is_not_ours() {
        let fx = fixture(&callback("state=foo&code=abc"));
        fx.storage.set_prompt_none_request_sent(true);

        let seen = Mutex::new(Vec::new());
        let setter = |state: Option<String>| seen.lock().push(state);

        let interpreter = ResponseInterpreter::new(fx.collaborators.clone());
        let handled = interpreter
            .receive_prompt_none_response(Some(&setter))
            .await
            .unwrap();

        assert!(!handled);
        assert!(seen.lock().is_empty());
        assert!(fx.host.events().is_empty());
        assert_eq!(fx.sign_out.calls(), 0);
        // Gate untouched
        assert!(!fx.storage.can_send_prompt_none_request());
    }

    #[tokio::test]
    async fn test_missing_state_and_non_url_location() {
        let fx = fixture("https://app.example.com/callback?code=abc");
        let interpreter = ResponseInterpreter::new(fx.collaborators.clone());
        assert!(!interpreter.receive_prompt_none_response(None).await.unwrap());

        fx.host.set_location("not a url");
        assert!(!interpreter.receive_prompt_none_response(None).await.unwrap());
        assert!(fx.host.events().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_grandparent_is_an_error() {
        let fx = fixture(&callback("state=Y2hlY2tTZXNzaW9uU2lsZW50bHk%3D&code=abc"));
        fx.host.set_unreachable(WindowTarget::Grandparent);

        let interpreter = ResponseInterpreter::new(fx.collaborators.clone());
        assert!(interpreter.receive_prompt_none_response(None).await.is_err());
    }
}
