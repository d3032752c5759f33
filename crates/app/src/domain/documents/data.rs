//! Documents Data

use jiff::civil::Date;

use crate::domain::documents::records::{DocumentKind, DocumentStatus, DocumentUuid, PatientUuid};

/// New Patient Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPatient {
    pub uuid: PatientUuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

/// New Document Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub uuid: DocumentUuid,
    pub patient_uuid: PatientUuid,
    pub kind: DocumentKind,
    pub number: String,
    pub status: DocumentStatus,
    pub total: u64,
    pub issued_on: Date,
    pub valid_until: Option<Date>,
    pub notes: Option<String>,
    pub items: Vec<NewDocumentItem>,
}

/// New Document Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocumentItem {
    pub description: String,
    pub quantity: u32,
    pub base_price: u64,
    pub discount: u64,
    pub final_price: u64,
}

/// Document Update Data
///
/// `items: None` keeps the current line items; `Some` replaces them all.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpdate {
    pub total: u64,
    pub valid_until: Option<Date>,
    pub notes: Option<String>,
    pub items: Option<Vec<NewDocumentItem>>,
}
