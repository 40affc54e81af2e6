//! Protocol constants shared by every browsing context taking part in
//! session management (main window, relay frame, prompt-none redirect target).
//!
//! These travel on the wire (URL `state`, relay message `type`) or name
//! shared same-origin storage entries, so all contexts must agree on them.

/// `state` value for the periodic silent refresh driven by the poller.
pub const SILENT_REFRESH_STATE: &str = "Y2hlY2tTZXNzaW9u";

/// `state` value for the out-of-band silent sign-in launched by an embedding app.
pub const SILENT_SIGN_IN_STATE: &str = "Y2hlY2tTZXNzaW9uU2lsZW50bHk=";

/// Relay message kind: the OP issued a code without user interaction.
pub const CHECK_SESSION_SIGNED_IN: &str = "check_session_signed_in";

/// Relay message kind: the OP declined the silent request.
pub const CHECK_SESSION_SIGNED_OUT: &str = "check_session_signed_out";

/// Element id of the relay frame attached to the main document.
pub const RELAY_FRAME_ID: &str = "rpIFrame";

/// Element id of the OP check-session frame (nested in the relay frame).
pub const OP_FRAME_ID: &str = "opIFrame";

/// Element id of the prompt-none target frame (nested in the relay frame).
pub const PROMPT_NONE_FRAME_ID: &str = "promptNoneIFrame";

/// Storage key of the "prompt-none request in flight" gate.
pub const PROMPT_NONE_REQUEST_SENT: &str = "promptNoneRequestSent";

/// Storage key of the "silent sign-in is initializing" flag.
pub const INITIALIZED_SILENT_SIGN_IN: &str = "initialized-silent-sign-in";

/// Callback query key carrying the OP session state.
pub const SESSION_STATE: &str = "session_state";

/// OP reply: session state has not changed.
pub const OP_REPLY_UNCHANGED: &str = "unchanged";

/// OP reply: the OP could not evaluate the probe.
pub const OP_REPLY_ERROR: &str = "error";

/// Document every helper frame is parked on once its work is done.
pub const BLANK_DOCUMENT: &str = "about:blank";
