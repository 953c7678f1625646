//! Access token generation and comparison for public dashboards.
//!
//! A token is a bearer capability: whoever holds the string can view the
//! shared dashboard. Tokens therefore carry no structure (no dashboard or org
//! identifiers) and come straight from the operating-system CSPRNG.

use rand::rngs::OsRng;
use rand::TryRngCore;
use subtle::ConstantTimeEq;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of random bytes behind each token.
pub const TOKEN_BYTES: usize = 16;

/// Length of the rendered token (lowercase hex, two chars per byte).
pub const TOKEN_LENGTH: usize = TOKEN_BYTES * 2;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Source of fresh access tokens.
///
/// Uniqueness is not checked here; the storage unique constraint reports
/// collisions as [`CoreError::DuplicateToken`].
pub trait AccessTokenGenerator: Send + Sync {
    fn generate(&self) -> Result<String, CoreError>;
}

/// Production generator backed by [`OsRng`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngTokenGenerator;

impl AccessTokenGenerator for OsRngTokenGenerator {
    fn generate(&self) -> Result<String, CoreError> {
        generate_access_token()
    }
}

/// Generate a new random access token: 16 bytes rendered as 32 hex chars.
pub fn generate_access_token() -> Result<String, CoreError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CoreError::RandomnessUnavailable(e.to_string()))?;
    Ok(hex::encode(bytes))
}

// ---------------------------------------------------------------------------
// Validation / comparison
// ---------------------------------------------------------------------------

/// Whether `token` has the shape of a generated token.
///
/// Lets callers reject garbage before it reaches storage.
pub fn is_valid_access_token(token: &str) -> bool {
    token.len() == TOKEN_LENGTH
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Compare two tokens in time independent of where they first differ.
///
/// Only the length may leak; every generated token has the same one.
#[must_use]
pub fn tokens_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

// ---------------------------------------------------------------------------
// hex encoding helper (no extra dep)
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_has_fixed_length() {
        let token = generate_access_token().unwrap();
        assert_eq!(token.len(), TOKEN_LENGTH);
    }

    #[test]
    fn generated_token_passes_shape_check() {
        let token = OsRngTokenGenerator.generate().unwrap();
        assert!(is_valid_access_token(&token), "unexpected token {token}");
    }

    #[test]
    fn consecutive_tokens_differ() {
        let a = generate_access_token().unwrap();
        let b = generate_access_token().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn shape_check_rejects_wrong_length_and_alphabet() {
        assert!(!is_valid_access_token(""));
        assert!(!is_valid_access_token("abc123"));
        assert!(!is_valid_access_token(&"g".repeat(TOKEN_LENGTH)));
        assert!(!is_valid_access_token(&"A".repeat(TOKEN_LENGTH)));
        assert!(is_valid_access_token(&"0f".repeat(TOKEN_BYTES)));
    }

    #[test]
    fn tokens_match_is_exact() {
        assert!(tokens_match("abcd", "abcd"));
        assert!(!tokens_match("abcd", "abce"));
        assert!(!tokens_match("abcd", "abcde"));
        assert!(!tokens_match("", "a"));
    }

    #[test]
    fn tokens_match_compares_full_generated_tokens() {
        let token = generate_access_token().unwrap();
        let mut flipped = token.clone().into_bytes();
        let last = flipped.len() - 1;
        flipped[last] = if flipped[last] == b'0' { b'1' } else { b'0' };
        let flipped = String::from_utf8(flipped).unwrap();

        assert!(tokens_match(&token, &token.clone()));
        assert!(!tokens_match(&token, &flipped));
        assert!(tokens_match("", ""));
    }
}
