//! Link passwords.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};
use thiserror::Error;
use tokio::task::{JoinError, spawn_blocking};

/// bcrypt work factor for link passwords.
pub const BCRYPT_COST: u32 = 10;

/// Random bytes per generated password; encodes to 8 characters.
const GENERATED_PASSWORD_BYTES: usize = 6;

/// bcrypt ignores everything past this many bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("password hashing task failed")]
    Task(#[from] JoinError),
}

/// Why a staff-chosen password was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("password is empty")]
    Empty,

    #[error("password is longer than {MAX_PASSWORD_BYTES} bytes")]
    TooLong,
}

/// Check a password chosen by staff before it is hashed.
///
/// # Errors
///
/// Returns an error for blank passwords and for passwords bcrypt would
/// truncate.
pub fn check_password(password: &str) -> Result<(), PasswordPolicyError> {
    if password.trim().is_empty() {
        return Err(PasswordPolicyError::Empty);
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordPolicyError::TooLong);
    }

    Ok(())
}

/// Generate a short password from the URL-safe base64 alphabet.
#[must_use]
pub fn generate_password() -> String {
    let mut bytes = [0_u8; GENERATED_PASSWORD_BYTES];

    OsRng.fill_bytes(&mut bytes);

    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a password with bcrypt off the async runtime.
///
/// # Errors
///
/// Returns an error when bcrypt fails or the blocking task is cancelled.
pub async fn hash_password(password: String) -> Result<String, PasswordError> {
    Ok(spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST)).await??)
}

/// Check `password` against a stored hash. Links without a hash accept any
/// password.
///
/// # Errors
///
/// Returns an error when the stored hash is malformed or the blocking task is
/// cancelled.
pub async fn verify_password(
    password: String,
    hash: Option<String>,
) -> Result<bool, PasswordError> {
    let Some(hash) = hash else {
        return Ok(true);
    };

    Ok(spawn_blocking(move || bcrypt::verify(password, &hash)).await??)
}
