//! opwatch Session Monitoring
//!
//! Keeps a relying party's view of the OP session honest:
//! - Polls the OP check-session frame with the current session state
//! - On a change (or on the refresh timer) sends a `prompt=none` request
//! - Interprets the callback inside the redirect target: update the session
//!   state, force sign-out, or relay the result of a silent sign-in
//!
//! Fatal outcomes all funnel into one path: ask the sign-out provider for a
//! URL and navigate the top-level window there.

mod collaborators;
mod context;
mod error;
mod initiator;
mod interpreter;
mod monitor;
mod poller;
mod schedule;
mod silent_sign_in;
mod state;
#[cfg(test)]
mod test_support;

pub use collaborators::{sign_out_and_redirect, Collaborators, SessionStateSetter, SignOutProvider};
pub use context::{ClientSettings, SessionContext};
pub use error::SessionError;
pub use initiator::SilentReauthInitiator;
pub use interpreter::ResponseInterpreter;
pub use monitor::SessionMonitor;
pub use poller::{PollerStatus, SessionPoller};
pub use schedule::{IntervalController, Schedule};
pub use silent_sign_in::{SilentSignIn, SilentSignInOutcome};
pub use state::PollerState;

pub type Result<T> = std::result::Result<T, SessionError>;
