//! Public Link Models

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tq_app::domain::{
    access_links::{
        AccessLinksServiceError,
        data::{DocumentActionOutcome, OpenedLink},
        records::LinkChannel,
    },
    documents::records::DocumentStatus,
};

use crate::{
    extensions::*,
    observability::{PublicLinkOutcome, record_public_link_access},
    settings::BrandingResponse,
};

/// Unlock Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UnlockRequest {
    /// Password sent to the patient with the link
    pub password: Option<String>,
}

impl UnlockRequest {
    /// The password, which is mandatory even for links stored without one.
    pub(crate) fn into_password(self, channel: LinkChannel) -> Result<String, StatusError> {
        self.password.ok_or_else(|| {
            record_public_link_access(channel, PublicLinkOutcome::Rejected);

            StatusError::bad_request()
                .brief("password is required")
                .detail("VALIDATION_ERROR")
        })
    }
}

/// Unlocked link content
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OpenedLinkResponse {
    /// Frozen content package: page template plus pre-formatted document data
    pub content: Value,

    /// Clinic branding to render the page with
    pub branding: BrandingResponse,
}

impl OpenedLinkResponse {
    pub(crate) fn try_from_opened(opened: OpenedLink) -> Result<Self, StatusError> {
        let content = serde_json::to_value(&opened.content)
            .or_500("failed to serialise content package")?;

        Ok(Self {
            content,
            branding: opened.branding.into(),
        })
    }
}

/// Quote approval result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApprovalResponse {
    pub approved: bool,
    pub quote_number: String,
}

impl From<DocumentActionOutcome> for ApprovalResponse {
    fn from(outcome: DocumentActionOutcome) -> Self {
        Self {
            approved: outcome.status == DocumentStatus::Approved,
            quote_number: outcome.document_number,
        }
    }
}

/// Prevention viewed result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ViewedResponse {
    pub viewed: bool,
    pub document_number: String,

    /// Status after the call; later statuses are left untouched
    pub status: String,
}

impl From<DocumentActionOutcome> for ViewedResponse {
    fn from(outcome: DocumentActionOutcome) -> Self {
        Self {
            viewed: true,
            document_number: outcome.document_number,
            status: outcome.status.to_string(),
        }
    }
}

/// Count the request against the channel's public access metric.
pub(crate) fn record_outcome<T>(
    channel: LinkChannel,
    result: &Result<T, AccessLinksServiceError>,
    success: PublicLinkOutcome,
) {
    let outcome = match result {
        Ok(_) => success,
        Err(AccessLinksServiceError::NotFound) => PublicLinkOutcome::NotFound,
        Err(AccessLinksServiceError::InvalidPassword) => PublicLinkOutcome::InvalidPassword,
        Err(
            AccessLinksServiceError::UnsupportedAction(_)
            | AccessLinksServiceError::ChannelMismatch(_),
        ) => PublicLinkOutcome::Rejected,
        Err(AccessLinksServiceError::Conflict(_)) => PublicLinkOutcome::Conflict,
        Err(_) => PublicLinkOutcome::Error,
    };

    record_public_link_access(channel, outcome);
}
