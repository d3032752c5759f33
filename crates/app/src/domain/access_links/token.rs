//! Public access tokens.

use std::fmt;

use rand::{RngCore, rngs::OsRng};
use thiserror::Error;

/// Number of random bytes behind a token.
pub const ACCESS_TOKEN_BYTES: usize = 32;

const ACCESS_TOKEN_HEX_CHARS: usize = ACCESS_TOKEN_BYTES * 2;

/// Opaque token that identifies a shared link in its public URL.
///
/// Always 64 lowercase hex characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("access token format is invalid")]
pub struct InvalidAccessToken;

impl AccessToken {
    /// Generate a token from the operating system's CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; ACCESS_TOKEN_BYTES];

        OsRng.fill_bytes(&mut bytes);

        Self(encode_hex(&bytes))
    }

    /// Accept a token received from a client.
    ///
    /// # Errors
    ///
    /// Returns an error unless `value` is exactly 64 lowercase hex characters.
    pub fn parse(value: &str) -> Result<Self, InvalidAccessToken> {
        let valid = value.len() == ACCESS_TOKEN_HEX_CHARS
            && value
                .bytes()
                .all(|byte| matches!(byte, b'0'..=b'9' | b'a'..=b'f'));

        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(InvalidAccessToken)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(**redacted**)")
    }
}

pub(crate) fn encode_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(bytes.len() * 2);

    for byte in bytes {
        encoded.push(char::from(HEX[usize::from(byte >> 4)]));
        encoded.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }

    encoded
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn generated_tokens_are_64_lowercase_hex() {
        let token = AccessToken::generate();

        assert_eq!(token.as_str().len(), 64);
        assert_eq!(AccessToken::parse(token.as_str()), Ok(token.clone()));
    }

    #[test]
    fn generated_tokens_do_not_repeat() {
        let tokens: HashSet<_> = (0..64).map(|_| AccessToken::generate()).collect();

        assert_eq!(tokens.len(), 64);
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        assert_eq!(AccessToken::parse(""), Err(InvalidAccessToken));
        assert_eq!(AccessToken::parse(&"a".repeat(63)), Err(InvalidAccessToken));
        assert_eq!(AccessToken::parse(&"A".repeat(64)), Err(InvalidAccessToken));
        assert_eq!(AccessToken::parse(&"g".repeat(64)), Err(InvalidAccessToken));
        assert_eq!(AccessToken::parse(&"ab".repeat(32)), Ok(AccessToken("ab".repeat(32))));
    }

    #[test]
    fn encode_hex_uses_two_chars_per_byte() {
        assert_eq!(encode_hex(&[0x00, 0x0f, 0xab, 0xff]), "000fabff");
    }

    #[test]
    fn debug_output_is_redacted() {
        let token = AccessToken::generate();

        assert_eq!(format!("{token:?}"), "AccessToken(**redacted**)");
    }
}
