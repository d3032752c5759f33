//! Document Models

use jiff::civil::Date;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tq_app::domain::documents::{
    data::{DocumentUpdate, NewDocument, NewDocumentItem},
    records::{DocumentBundle, DocumentItemRecord, DocumentKind, DocumentStatus, PatientRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DocumentKindParam {
    Quote,
    Prevention,
}

impl From<DocumentKindParam> for DocumentKind {
    fn from(kind: DocumentKindParam) -> Self {
        match kind {
            DocumentKindParam::Quote => Self::Quote,
            DocumentKindParam::Prevention => Self::Prevention,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DocumentStatusParam {
    #[default]
    Draft,
    Sent,
    Viewed,
    Approved,
    Rejected,
    Expired,
}

impl From<DocumentStatusParam> for DocumentStatus {
    fn from(status: DocumentStatusParam) -> Self {
        match status {
            DocumentStatusParam::Draft => Self::Draft,
            DocumentStatusParam::Sent => Self::Sent,
            DocumentStatusParam::Viewed => Self::Viewed,
            DocumentStatusParam::Approved => Self::Approved,
            DocumentStatusParam::Rejected => Self::Rejected,
            DocumentStatusParam::Expired => Self::Expired,
        }
    }
}

/// Line item; amounts in cents.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct DocumentItemRequest {
    pub description: String,
    pub quantity: u32,
    pub base_price: u64,

    #[serde(default)]
    pub discount: u64,

    pub final_price: u64,
}

impl From<DocumentItemRequest> for NewDocumentItem {
    fn from(item: DocumentItemRequest) -> Self {
        Self {
            description: item.description,
            quantity: item.quantity,
            base_price: item.base_price,
            discount: item.discount,
            final_price: item.final_price,
        }
    }
}

/// Create Document Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateDocumentRequest {
    pub uuid: Uuid,
    pub patient_uuid: Uuid,
    pub kind: DocumentKindParam,
    pub number: String,

    #[serde(default)]
    pub status: DocumentStatusParam,

    /// Total in cents
    pub total: u64,

    /// `YYYY-MM-DD`
    pub issued_on: String,

    /// `YYYY-MM-DD`
    pub valid_until: Option<String>,

    pub notes: Option<String>,

    #[serde(default)]
    pub items: Vec<DocumentItemRequest>,
}

impl CreateDocumentRequest {
    pub(crate) fn into_new_document(self) -> Result<NewDocument, StatusError> {
        Ok(NewDocument {
            uuid: self.uuid.into(),
            patient_uuid: self.patient_uuid.into(),
            kind: self.kind.into(),
            number: self.number,
            status: self.status.into(),
            total: self.total,
            issued_on: parse_date("issued_on", &self.issued_on)?,
            valid_until: parse_optional_date("valid_until", self.valid_until.as_deref())?,
            notes: self.notes,
            items: self.items.into_iter().map(Into::into).collect(),
        })
    }
}

/// Update Document Request
///
/// Leaving `items` out keeps the current line items.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateDocumentRequest {
    /// Total in cents
    pub total: u64,

    /// `YYYY-MM-DD`
    pub valid_until: Option<String>,

    pub notes: Option<String>,
    pub items: Option<Vec<DocumentItemRequest>>,
}

impl UpdateDocumentRequest {
    pub(crate) fn into_update(self) -> Result<DocumentUpdate, StatusError> {
        Ok(DocumentUpdate {
            total: self.total,
            valid_until: parse_optional_date("valid_until", self.valid_until.as_deref())?,
            notes: self.notes,
            items: self
                .items
                .map(|items| items.into_iter().map(Into::into).collect()),
        })
    }
}

fn parse_date(field: &str, value: &str) -> Result<Date, StatusError> {
    value.parse::<Date>().map_err(|source| {
        StatusError::bad_request().brief(format!("{field} is not a valid date: {source}"))
    })
}

fn parse_optional_date(field: &str, value: Option<&str>) -> Result<Option<Date>, StatusError> {
    value.map(|value| parse_date(field, value)).transpose()
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PatientResponse {
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub created_at: String,
}

impl From<PatientRecord> for PatientResponse {
    fn from(patient: PatientRecord) -> Self {
        Self {
            uuid: patient.uuid.into(),
            first_name: patient.first_name,
            last_name: patient.last_name,
            email: patient.email,
            created_at: patient.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DocumentItemResponse {
    pub position: u32,
    pub description: String,
    pub quantity: u32,
    pub base_price: u64,
    pub discount: u64,
    pub final_price: u64,
}

impl From<DocumentItemRecord> for DocumentItemResponse {
    fn from(item: DocumentItemRecord) -> Self {
        Self {
            position: item.position,
            description: item.description,
            quantity: item.quantity,
            base_price: item.base_price,
            discount: item.discount,
            final_price: item.final_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DocumentResponse {
    pub uuid: Uuid,
    pub kind: String,
    pub number: String,
    pub status: String,

    /// Total in cents
    pub total: u64,

    pub issued_on: String,
    pub valid_until: Option<String>,
    pub notes: Option<String>,
    pub patient: PatientResponse,
    pub items: Vec<DocumentItemResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DocumentBundle> for DocumentResponse {
    fn from(bundle: DocumentBundle) -> Self {
        let document = bundle.document;

        Self {
            uuid: document.uuid.into(),
            kind: document.kind.to_string(),
            number: document.number,
            status: document.status.to_string(),
            total: document.total,
            issued_on: document.issued_on.to_string(),
            valid_until: document.valid_until.map(|date| date.to_string()),
            notes: document.notes,
            patient: bundle.patient.into(),
            items: bundle.items.into_iter().map(Into::into).collect(),
            created_at: document.created_at.to_string(),
            updated_at: document.updated_at.to_string(),
        }
    }
}
