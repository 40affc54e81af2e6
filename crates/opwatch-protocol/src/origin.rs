//! Origin handling for cross-frame messaging
//!
//! Messages are always sent to an explicit origin and accepted only from the
//! exact origin they are expected from. Opaque origins never match.

use url::Url;

use crate::error::ProtocolError;
use crate::Result;

/// Serialized tuple origin (`scheme://host[:port]`) of a URL.
pub fn origin_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    let origin = parsed.origin();

    if !origin.is_tuple() {
        return Err(ProtocolError::OpaqueOrigin(url.to_string()));
    }

    Ok(origin.ascii_serialization())
}

/// Check that a message `origin` is exactly the origin of `expected_url`.
pub fn origin_matches(expected_url: &str, origin: &str) -> bool {
    match origin_of(expected_url) {
        Ok(expected) => expected == origin,
        Err(_) => false,
    }
}
