//! Shared fixtures for session tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use opwatch_frames::testing::RecordingHost;
use opwatch_frames::{FrameName, WindowTarget};
use opwatch_storage::SessionStorage;

use crate::collaborators::{Collaborators, SignOutProvider};
use crate::context::{ClientSettings, SessionContext};

pub const APP_ORIGIN: &str = "https://app.example.com";
pub const OP_ORIGIN: &str = "https://op.example.com";
pub const CHECK_SESSION_ENDPOINT: &str = "https://op.example.com/oidc/checksession";
pub const AUTHORIZATION_ENDPOINT: &str = "https://op.example.com/oauth2/authorize";
pub const REDIRECT_URL: &str = "https://app.example.com/callback";
pub const SIGN_OUT_URL: &str = "https://op.example.com/oidc/logout?id_token_hint=t";

pub const RELAY: WindowTarget = WindowTarget::Frame(FrameName::Relay);
pub const OP_FRAME: WindowTarget = WindowTarget::Frame(FrameName::OpCheckSession);
pub const PROMPT_NONE: WindowTarget = WindowTarget::Frame(FrameName::PromptNone);

pub struct StaticSignOut {
    url: String,
    calls: AtomicUsize,
}

impl StaticSignOut {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignOutProvider for StaticSignOut {
    async fn sign_out(&self) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.url.clone())
    }
}

pub struct FailingSignOut;

#[async_trait]
impl SignOutProvider for FailingSignOut {
    async fn sign_out(&self) -> anyhow::Result<String> {
        anyhow::bail!("token revocation endpoint unreachable")
    }
}

pub struct Fixture {
    pub host: Arc<RecordingHost>,
    pub storage: SessionStorage,
    pub sign_out: Arc<StaticSignOut>,
    pub collaborators: Collaborators,
}

pub fn fixture(location: &str) -> Fixture {
    let host = Arc::new(RecordingHost::new(location));
    let storage = SessionStorage::new();
    let sign_out = Arc::new(StaticSignOut::new(SIGN_OUT_URL));

    let collaborators = Collaborators {
        host: host.clone(),
        gate: Arc::new(storage.clone()),
        silent_sign_in: Arc::new(storage.clone()),
        sign_out: sign_out.clone(),
    };

    Fixture {
        host,
        storage,
        sign_out,
        collaborators,
    }
}

pub fn client() -> ClientSettings {
    ClientSettings::new("client-1", AUTHORIZATION_ENDPOINT, REDIRECT_URL)
}

pub fn context(poll_interval_secs: i64, session_refresh_interval_secs: i64) -> SessionContext {
    SessionContext::new(
        client(),
        CHECK_SESSION_ENDPOINT,
        "session-state-1",
        poll_interval_secs,
        session_refresh_interval_secs,
    )
}

/// Let spawned tasks run without moving the clock.
pub async fn run_pending() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

pub fn query_param(url: &str, key: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
