//! Request URLs sent to the OP
//!
//! - The check-session frame source: `{endpoint}?client_id=..&redirect_uri=..`
//! - The `prompt=none` authorization request navigated into the prompt-none frame

use url::Url;

use crate::Result;

/// Parameters of a silent (`prompt=none`) authorization request.
#[derive(Debug, Clone)]
pub struct PromptNoneRequest<'a> {
    pub authorization_endpoint: &'a str,
    pub client_id: &'a str,
    pub redirect_url: &'a str,
    /// One of the protocol `state` markers
    pub state: &'a str,
    pub code_challenge: &'a str,
}

/// Build the authorization URL of a `prompt=none` request.
pub fn prompt_none_url(request: &PromptNoneRequest<'_>) -> Result<Url> {
    let mut url = Url::parse(request.authorization_endpoint)?;

    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", request.client_id)
        .append_pair("scope", "openid")
        .append_pair("redirect_uri", request.redirect_url)
        .append_pair("state", request.state)
        .append_pair("prompt", "none")
        .append_pair("code_challenge_method", "S256")
        .append_pair("code_challenge", request.code_challenge);

    Ok(url)
}

/// Build the source URL of the OP check-session frame.
pub fn check_session_frame_url(
    check_session_endpoint: &str,
    client_id: &str,
    redirect_url: &str,
) -> Result<Url> {
    let mut url = Url::parse(check_session_endpoint)?;

    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_url);

    Ok(url)
}
