//! Access Link Models

use std::fmt;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tq_app::domain::access_links::{
    data::{IssuedAccessLink, NewAccessLink},
    password::check_password,
    records::{AccessLinkRecord, LinkChannel},
};

/// Create Access Link Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateAccessLinkRequest {
    pub document_uuid: Uuid,

    /// Page template to freeze; the tenant default when omitted
    pub template_uuid: Option<Uuid>,

    /// RFC 3339 timestamp after which the link stops opening
    #[salvo(schema(value_type = Option<String>))]
    pub expires_at: Option<Timestamp>,

    /// Generated when omitted; at most 72 bytes
    pub password: Option<String>,

    /// Overrides the patient's email address
    pub recipient_email: Option<String>,
}

impl fmt::Debug for CreateAccessLinkRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateAccessLinkRequest")
            .field("document_uuid", &self.document_uuid)
            .field("template_uuid", &self.template_uuid)
            .field("expires_at", &self.expires_at)
            .field("recipient_email", &self.recipient_email)
            .finish_non_exhaustive()
    }
}

impl CreateAccessLinkRequest {
    pub(crate) fn into_new_link(self, channel: LinkChannel) -> Result<NewAccessLink, StatusError> {
        if let Some(password) = self.password.as_deref() {
            check_password(password).map_err(|reason| {
                StatusError::bad_request()
                    .brief(format!("Invalid link password: {reason}"))
                    .detail("INVALID_LINK_PASSWORD")
            })?;
        }

        Ok(NewAccessLink {
            channel,
            document_uuid: self.document_uuid.into(),
            template_uuid: self.template_uuid.map(Into::into),
            expires_at: self.expires_at,
            password: self.password,
            recipient_email: self.recipient_email,
        })
    }
}

/// A link as staff see it. The password and access token are never listed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AccessLinkResponse {
    pub uuid: Uuid,
    pub document_uuid: Uuid,
    pub document_kind: String,
    pub channel: String,
    pub template_uuid: Option<Uuid>,
    pub recipient_email: Option<String>,
    pub active: bool,
    pub expires_at: Option<String>,
    pub views_count: u64,
    pub last_viewed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AccessLinkRecord> for AccessLinkResponse {
    fn from(link: AccessLinkRecord) -> Self {
        Self {
            uuid: link.uuid.into(),
            document_uuid: link.document_uuid.into(),
            document_kind: link.document_kind.to_string(),
            channel: link.channel.to_string(),
            template_uuid: link.template_uuid.map(Into::into),
            recipient_email: link.recipient_email,
            active: link.active,
            expires_at: link.expires_at.as_ref().map(ToString::to_string),
            views_count: link.views_count,
            last_viewed_at: link.last_viewed_at.as_ref().map(ToString::to_string),
            created_at: link.created_at.to_string(),
            updated_at: link.updated_at.to_string(),
        }
    }
}

/// A newly issued or re-keyed link. The password is only ever shown here.
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct IssuedAccessLinkResponse {
    pub url: String,
    pub password: String,
    pub link: AccessLinkResponse,
}

impl fmt::Debug for IssuedAccessLinkResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedAccessLinkResponse")
            .field("link", &self.link)
            .finish_non_exhaustive()
    }
}

impl From<IssuedAccessLink> for IssuedAccessLinkResponse {
    fn from(issued: IssuedAccessLink) -> Self {
        Self {
            url: issued.url,
            password: issued.password,
            link: issued.link.into(),
        }
    }
}
