//! opwatch Protocol
//!
//! Wire-level pieces of OpenID Connect session management as seen by a
//! relying party running in a browser tab:
//! - Check Session probe (`"{client_id} {session_state}"`) and OP replies
//! - `prompt=none` authorization request with a fresh PKCE challenge
//! - Callback query parameters returned to the redirect target
//! - Relay messages posted from the redirect target to the embedding window

mod authorize;
mod callback;
pub mod constants;
mod error;
mod message;
mod origin;
mod pkce;

pub use authorize::{check_session_frame_url, prompt_none_url, PromptNoneRequest};
pub use callback::{CallbackParameters, ResponseFlow};
pub use error::ProtocolError;
pub use message::{AuthorizationInfo, OpReply, ProbeMessage, RelayMessage};
pub use origin::{origin_matches, origin_of};
pub use pkce::{is_unreserved, random_challenge, CHALLENGE_LENGTH, UNRESERVED};

pub type Result<T> = std::result::Result<T, ProtocolError>;
