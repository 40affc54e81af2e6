//! PKCE code challenge generation
//!
//! Every `prompt=none` request carries a challenge drawn fresh from the RFC 7636
//! unreserved alphabet. Challenges are never cached or reused.

use rand::Rng;

/// Length of a generated challenge (RFC 7636 minimum verifier length).
pub const CHALLENGE_LENGTH: usize = 43;

/// RFC 7636 unreserved characters: `ALPHA / DIGIT / "-" / "." / "_" / "~"`.
pub const UNRESERVED: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Generate a challenge of [`CHALLENGE_LENGTH`] characters, each drawn
/// uniformly from [`UNRESERVED`] using the thread-local CSPRNG.
#[must_use]
pub fn random_challenge() -> String {
    let mut rng = rand::rng();
    (0..CHALLENGE_LENGTH)
        .map(|_| UNRESERVED[rng.random_range(0..UNRESERVED.len())] as char)
        .collect()
}

pub fn is_unreserved(c: char) -> bool {
    c.is_ascii() && UNRESERVED.contains(&(c as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet() {
        assert_eq!(UNRESERVED.len(), 66);

        let distinct: HashSet<&u8> = UNRESERVED.iter().collect();
        assert_eq!(distinct.len(), UNRESERVED.len());
    }

    #[test]
    fn test_challenge_shape() {
        for _ in 0..200 {
            let challenge = random_challenge();
            assert_eq!(challenge.len(), CHALLENGE_LENGTH);
            assert!(challenge.chars().all(is_unreserved));
        }
    }

    #[test]
    fn test_challenges_differ() {
        let first = random_challenge();
        let second = random_challenge();
        assert_ne!(first, second);
    }

    #[test]
    fn test_is_unreserved() {
        assert!(is_unreserved('a'));
        assert!(is_unreserved('Z'));
        assert!(is_unreserved('7'));
        assert!(is_unreserved('~'));
        assert!(!is_unreserved('+'));
        assert!(!is_unreserved('/'));
        assert!(!is_unreserved('='));
        assert!(!is_unreserved('é'));
    }
}
