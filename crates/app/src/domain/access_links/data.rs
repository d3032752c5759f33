//! Access Link Data

use std::fmt;

use jiff::Timestamp;

use crate::domain::{
    access_links::records::{AccessLinkRecord, LinkChannel},
    branding::TenantBranding,
    content::{ContentPackage, records::PageTemplateUuid},
    documents::records::{DocumentStatus, DocumentUuid},
};

/// New Access Link Data
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccessLink {
    pub channel: LinkChannel,
    pub document_uuid: DocumentUuid,

    /// Layout to snapshot; the tenant default when omitted.
    pub template_uuid: Option<PageTemplateUuid>,

    pub expires_at: Option<Timestamp>,

    /// Generated when omitted.
    pub password: Option<String>,

    /// Overrides the patient's email address as the recipient.
    pub recipient_email: Option<String>,
}

impl fmt::Debug for NewAccessLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccessLink")
            .field("channel", &self.channel)
            .field("document_uuid", &self.document_uuid)
            .field("template_uuid", &self.template_uuid)
            .field("expires_at", &self.expires_at)
            .field("recipient_email", &self.recipient_email)
            .finish_non_exhaustive()
    }
}

/// A link together with its public URL and the one-time plaintext password.
#[derive(Clone, PartialEq)]
pub struct IssuedAccessLink {
    pub link: AccessLinkRecord,
    pub url: String,
    pub password: String,
}

impl fmt::Debug for IssuedAccessLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedAccessLink")
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}

/// What a public viewer receives after unlocking a link.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedLink {
    pub content: ContentPackage,
    pub branding: TenantBranding,
}

/// Result of a public document action such as approving a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentActionOutcome {
    pub document_number: String,
    pub status: DocumentStatus,

    /// False when the document was already in the target status.
    pub changed: bool,
}
