//! API token formatting, parsing, and hashing.
//!
//! Tokens look like `tq_<token uuid>.<64 hex secret>`. Only the SHA-256 of
//! the whole token string is stored.

use std::fmt;

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::access_links::token::encode_hex;

/// API token identifier prefix.
pub const API_TOKEN_PREFIX: &str = "tq";

/// Number of secret bytes encoded in a token.
pub const API_TOKEN_SECRET_BYTES: usize = 32;

const API_TOKEN_SECRET_HEX_CHARS: usize = API_TOKEN_SECRET_BYTES * 2;

#[derive(Clone)]
pub struct ApiTokenSecret {
    bytes: [u8; API_TOKEN_SECRET_BYTES],
}

impl ApiTokenSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; API_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; API_TOKEN_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for ApiTokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiTokenSecret(**redacted**)")
    }
}

impl Drop for ApiTokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedApiToken {
    pub token_uuid: Uuid,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiTokenError {
    #[error("api token format is invalid")]
    InvalidFormat,

    #[error("api token secret encoding is invalid")]
    InvalidSecretEncoding,
}

#[must_use]
pub fn generate_api_token_secret() -> ApiTokenSecret {
    let mut secret = [0_u8; API_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    ApiTokenSecret::from_bytes(secret)
}

#[must_use]
pub fn format_api_token(token_uuid: Uuid, secret: &ApiTokenSecret) -> String {
    format!(
        "{API_TOKEN_PREFIX}_{}.{}",
        token_uuid.simple(),
        encode_hex(secret.as_bytes())
    )
}

/// Check the shape of a bearer token before it is looked up.
///
/// # Errors
///
/// Returns an error when the prefix, UUID or secret segment is malformed.
pub fn parse_api_token(token: &str) -> Result<ParsedApiToken, ApiTokenError> {
    let (prefix_and_id, secret_hex) = token.split_once('.').ok_or(ApiTokenError::InvalidFormat)?;

    let (prefix, token_uuid_segment) = prefix_and_id
        .split_once('_')
        .ok_or(ApiTokenError::InvalidFormat)?;

    if prefix != API_TOKEN_PREFIX {
        return Err(ApiTokenError::InvalidFormat);
    }

    let token_uuid = Uuid::try_parse(token_uuid_segment)
        .ok()
        .ok_or(ApiTokenError::InvalidFormat)?;

    let valid_secret = secret_hex.len() == API_TOKEN_SECRET_HEX_CHARS
        && secret_hex.bytes().all(|byte| byte.is_ascii_hexdigit());

    if !valid_secret {
        return Err(ApiTokenError::InvalidSecretEncoding);
    }

    Ok(ParsedApiToken { token_uuid })
}

/// SHA-256 of the full token, hex encoded.
#[must_use]
pub fn hash_api_token(token: &str) -> String {
    encode_hex(&Sha256::digest(token.as_bytes()))
}
