//! opwatch Core
//!
//! Entry point for integrators: configuration, logging setup and the
//! [`SessionWatch`] facade over the session-monitoring crates.

mod config;
mod error;
mod watch;

pub use config::Config;
pub use error::{ConfigError, CoreError};
pub use watch::SessionWatch;

// Re-export the building blocks integrators implement or inspect
pub use opwatch_frames::{BrowserHost, FrameError, FrameName, InboundMessage, WindowTarget};
pub use opwatch_protocol::{AuthorizationInfo, ProtocolError, RelayMessage};
pub use opwatch_session::{
    Collaborators, PollerState, PollerStatus, Schedule, SessionError, SessionStateSetter,
    SignOutProvider, SilentSignInOutcome,
};
pub use opwatch_storage::{PromptNoneGate, SessionStorage, SilentSignInFlag, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if fmt().with_env_filter(filter).with_target(true).try_init().is_err() {
        tracing::debug!("Logging already initialized");
    }
}
