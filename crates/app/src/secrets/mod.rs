//! Secrets
//!
//! Encryption at rest for tenant credentials such as SMTP passwords.

mod openbao;

use async_trait::async_trait;
use mockall::automock;
use zeroize::Zeroizing;

pub use openbao::{OpenBaoClient, OpenBaoConfig, OpenBaoError};

#[automock]
#[async_trait]
pub trait SecretCipher: Send + Sync {
    /// Encrypt `plaintext`, returning an opaque ciphertext safe to persist.
    async fn encrypt(&self, plaintext: &str) -> Result<String, OpenBaoError>;

    /// Decrypt a ciphertext previously produced by [`SecretCipher::encrypt`].
    async fn decrypt(&self, ciphertext: &str) -> Result<Zeroizing<String>, OpenBaoError>;
}
