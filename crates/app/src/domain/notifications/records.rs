//! Notification Records

use jiff::Timestamp;

use crate::domain::documents::records::DocumentKind;

/// Email Template Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplateRecord {
    pub kind: DocumentKind,
    pub subject: String,
    pub body: String,
    pub updated_at: Timestamp,
}

/// Stored SMTP settings. The password is only held encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettingsRecord {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub username: String,
    pub password_ciphertext: String,
    pub from_address: String,
    pub from_name: Option<String>,
    pub updated_at: Timestamp,
}
