//! Document Records

use std::{fmt, str::FromStr};

use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Patient UUID
pub type PatientUuid = TypedUuid<PatientRecord>;

/// Document UUID
pub type DocumentUuid = TypedUuid<DocumentRecord>;

/// Document Item UUID
pub type DocumentItemUuid = TypedUuid<DocumentItemRecord>;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {field} value: {value}")]
pub struct UnknownVariant {
    field: &'static str,
    value: String,
}

impl UnknownVariant {
    #[must_use]
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

/// Kind of document an access link can share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Quote,
    Prevention,
}

impl DocumentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Prevention => "prevention",
        }
    }

    /// Whether a public viewer may perform `action` on this kind of document.
    #[must_use]
    pub const fn supports(self, action: DocumentAction) -> bool {
        matches!(
            (self, action),
            (Self::Quote, DocumentAction::Approve) | (Self::Prevention, DocumentAction::MarkViewed)
        )
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "quote" => Ok(Self::Quote),
            "prevention" => Ok(Self::Prevention),
            _ => Err(UnknownVariant::new("document kind", value)),
        }
    }
}

/// Lifecycle status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Sent,
    Viewed,
    Approved,
    Rejected,
    Expired,
}

impl DocumentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Viewed => "viewed",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "viewed" => Ok(Self::Viewed),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            _ => Err(UnknownVariant::new("document status", value)),
        }
    }
}

/// Actions a public viewer can take on a shared document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentAction {
    Approve,
    MarkViewed,
}

impl DocumentAction {
    /// Resolve the status a document moves to when this action is applied.
    ///
    /// `Ok(None)` means the document is already where the action would put
    /// it. `Err(current)` means the current status forbids the action.
    pub fn transition(
        self,
        current: DocumentStatus,
    ) -> Result<Option<DocumentStatus>, DocumentStatus> {
        match (self, current) {
            (
                Self::Approve,
                DocumentStatus::Approved | DocumentStatus::Rejected | DocumentStatus::Expired,
            ) => Err(current),
            (Self::Approve, _) => Ok(Some(DocumentStatus::Approved)),
            (Self::MarkViewed, DocumentStatus::Draft | DocumentStatus::Sent) => {
                Ok(Some(DocumentStatus::Viewed))
            }
            (Self::MarkViewed, _) => Ok(None),
        }
    }
}

/// Patient Record
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub uuid: PatientUuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Document Record
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRecord {
    pub uuid: DocumentUuid,
    pub patient_uuid: PatientUuid,
    pub kind: DocumentKind,
    pub number: String,
    pub status: DocumentStatus,

    /// Total in minor currency units.
    pub total: u64,

    pub issued_on: Date,
    pub valid_until: Option<Date>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Document line item. Amounts are minor currency units; `final_price` is
/// computed upstream as `quantity * (base_price - discount)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentItemRecord {
    pub uuid: DocumentItemUuid,
    pub position: u32,
    pub description: String,
    pub quantity: u32,
    pub base_price: u64,
    pub discount: u64,
    pub final_price: u64,
}

/// A document together with everything needed to render it.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBundle {
    pub document: DocumentRecord,
    pub patient: PatientRecord,
    pub items: Vec<DocumentItemRecord>,
}
