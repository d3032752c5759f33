//! Access Link Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        access_links::{
            password::{PasswordError, verify_password},
            token::AccessToken,
        },
        content::{ContentPackage, records::PageTemplateUuid},
        documents::records::{DocumentKind, DocumentUuid, UnknownVariant},
    },
    uuids::TypedUuid,
};

/// Access Link UUID
pub type AccessLinkUuid = TypedUuid<AccessLinkRecord>;

/// Public surface a link is shared through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkChannel {
    /// `/pq/{token}`, quotes only.
    PublicQuote,

    /// `/lp/{token}`, any document kind.
    LandingPage,
}

impl LinkChannel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PublicQuote => "public_quote",
            Self::LandingPage => "landing_page",
        }
    }

    /// Leading path segment of the public URL.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::PublicQuote => "pq",
            Self::LandingPage => "lp",
        }
    }

    /// Whether documents of `kind` can be shared through this channel.
    #[must_use]
    pub const fn accepts(self, kind: DocumentKind) -> bool {
        match self {
            Self::PublicQuote => matches!(kind, DocumentKind::Quote),
            Self::LandingPage => true,
        }
    }
}

impl fmt::Display for LinkChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkChannel {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "public_quote" => Ok(Self::PublicQuote),
            "landing_page" => Ok(Self::LandingPage),
            _ => Err(UnknownVariant::new("link channel", value)),
        }
    }
}

/// Access Link Record
#[derive(Debug, Clone, PartialEq)]
pub struct AccessLinkRecord {
    pub uuid: AccessLinkUuid,
    pub document_uuid: DocumentUuid,
    pub document_kind: DocumentKind,
    pub channel: LinkChannel,
    pub access_token: AccessToken,
    pub password_hash: Option<String>,
    pub recipient_email: Option<String>,
    pub template_uuid: Option<PageTemplateUuid>,

    /// Snapshot taken at creation; never refreshed from the live document.
    pub content: ContentPackage,

    pub active: bool,
    pub expires_at: Option<Timestamp>,
    pub views_count: u64,
    pub last_viewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AccessLinkRecord {
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Timestamp::now())
    }

    /// Active and not expired. Password checks are a separate step.
    #[must_use]
    pub fn is_accessible_at(&self, now: Timestamp) -> bool {
        self.active && !self.is_expired_at(now)
    }

    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.is_accessible_at(Timestamp::now())
    }

    /// Check a viewer's password. Links without a password accept anything.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored hash cannot be checked.
    pub async fn verify_password(&self, password: &str) -> Result<bool, PasswordError> {
        verify_password(password.to_string(), self.password_hash.clone()).await
    }
}
