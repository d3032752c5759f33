//! OpenBao Transit client for encryption operations.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::secrets::SecretCipher;

/// Configuration for connecting to an OpenBao instance.
#[derive(Debug, Clone)]
pub struct OpenBaoConfig {
    /// OpenBao server address, e.g. `"http://localhost:8200"`.
    pub addr: String,

    /// Vault/OpenBao authentication token.
    pub token: String,

    /// Transit key name to use for encryption.
    pub transit_key: String,
}

/// HTTP client for OpenBao Transit encrypt/decrypt operations.
#[derive(Debug, Clone)]
pub struct OpenBaoClient {
    config: OpenBaoConfig,
    http: Client,
}

impl OpenBaoClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: OpenBaoConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    async fn transit<T: DeserializeOwned>(
        &self,
        operation: &str,
        body: Value,
    ) -> Result<T, OpenBaoError> {
        let url = format!(
            "{}/v1/transit/{operation}/{}",
            self.config.addr.trim_end_matches('/'),
            self.config.transit_key
        );

        let response = self
            .http
            .post(&url)
            .header("X-Vault-Token", &self.config.token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(OpenBaoError::UnexpectedResponse(format!(
                "{operation} request failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SecretCipher for OpenBaoClient {
    async fn encrypt(&self, plaintext: &str) -> Result<String, OpenBaoError> {
        let body = serde_json::json!({ "plaintext": BASE64.encode(plaintext.as_bytes()) });

        let parsed: TransitResponse<EncryptData> = self.transit("encrypt", body).await?;

        Ok(parsed.data.ciphertext)
    }

    async fn decrypt(&self, ciphertext: &str) -> Result<Zeroizing<String>, OpenBaoError> {
        let body = serde_json::json!({ "ciphertext": ciphertext });

        let parsed: TransitResponse<DecryptData> = self.transit("decrypt", body).await?;

        decode_plaintext(&parsed.data.plaintext)
    }
}

fn decode_plaintext(encoded: &str) -> Result<Zeroizing<String>, OpenBaoError> {
    let bytes = Zeroizing::new(BASE64.decode(encoded).map_err(|error| {
        OpenBaoError::UnexpectedResponse(format!("plaintext is not base64: {error}"))
    })?);

    let plaintext = std::str::from_utf8(&bytes).map_err(|error| {
        OpenBaoError::UnexpectedResponse(format!("plaintext is not utf-8: {error}"))
    })?;

    Ok(Zeroizing::new(plaintext.to_string()))
}

#[derive(Debug, Deserialize)]
struct TransitResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct EncryptData {
    ciphertext: String,
}

#[derive(Deserialize)]
struct DecryptData {
    plaintext: String,
}

/// Errors that can occur when communicating with OpenBao.
#[derive(Debug, Error)]
pub enum OpenBaoError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// OpenBao returned a non-2xx response or unexpected body.
    #[error("unexpected response from OpenBao: {0}")]
    UnexpectedResponse(String),
}
