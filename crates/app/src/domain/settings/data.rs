//! Settings Data

use std::fmt;

use serde_json::Value;
use zeroize::Zeroizing;

/// SMTP settings as entered by staff, with the password still in plaintext.
#[derive(Clone)]
pub struct SmtpSettingsInput {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub username: String,
    pub password: Zeroizing<String>,
    pub from_address: String,
    pub from_name: Option<String>,
}

impl fmt::Debug for SmtpSettingsInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettingsInput")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .finish_non_exhaustive()
    }
}

/// New Page Template Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPageTemplate {
    pub name: String,
    pub definition: Value,

    /// Replaces any existing default.
    pub is_default: bool,
}
