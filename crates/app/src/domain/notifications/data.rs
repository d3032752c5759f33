//! Notification Data

use crate::domain::documents::records::DocumentKind;

/// Email Template Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmailTemplate {
    pub kind: DocumentKind,
    pub subject: String,
    pub body: String,
}

/// SMTP settings ready to persist, password already encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSmtpSettings {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub username: String,
    pub password_ciphertext: String,
    pub from_address: String,
    pub from_name: Option<String>,
}
