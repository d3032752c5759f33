//! Content package builder.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    content::format::{format_currency, format_date},
    documents::records::{
        DocumentBundle, DocumentItemRecord, DocumentKind, DocumentRecord, PatientRecord,
    },
    locale::Locale,
};

/// Shown when a patient has neither a first nor a last name.
pub const MISSING_NAME: &str = "N/A";

/// A template definition paired with the document data it renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPackage {
    pub template: Value,

    #[serde(rename = "resolvedData")]
    pub resolved_data: ResolvedData,
}

/// Display-ready document data. Every value is already formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedData {
    /// Serialized under the document kind, e.g. `"quote": { ... }`.
    #[serde(flatten)]
    pub document: DocumentSection,

    pub patient: ResolvedPatient,

    pub items: Vec<ResolvedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSection {
    Quote(ResolvedDocument),
    Prevention(ResolvedDocument),
}

impl DocumentSection {
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Quote(_) => DocumentKind::Quote,
            Self::Prevention(_) => DocumentKind::Prevention,
        }
    }

    #[must_use]
    pub fn document(&self) -> &ResolvedDocument {
        match self {
            Self::Quote(document) | Self::Prevention(document) => document,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    pub number: String,
    pub status: String,
    pub total: String,
    pub issued_on: String,
    pub valid_until: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPatient {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedItem {
    pub position: u32,
    pub description: String,
    pub quantity: u32,
    pub base_price: String,
    pub discount: String,
    pub final_price: String,
}

/// Build the package a link freezes and a staff preview renders.
///
/// Pure: the same inputs always produce the same package.
#[must_use]
pub fn build_content_package(
    template: Value,
    bundle: &DocumentBundle,
    locale: Locale,
) -> ContentPackage {
    let document = resolve_document(&bundle.document, locale);

    let document = match bundle.document.kind {
        DocumentKind::Quote => DocumentSection::Quote(document),
        DocumentKind::Prevention => DocumentSection::Prevention(document),
    };

    ContentPackage {
        template,
        resolved_data: ResolvedData {
            document,
            patient: resolve_patient(&bundle.patient),
            items: bundle.items.iter().map(resolve_item).collect(),
        },
    }
}

fn resolve_document(document: &DocumentRecord, locale: Locale) -> ResolvedDocument {
    ResolvedDocument {
        number: document.number.clone(),
        status: document.status.to_string(),
        total: format_currency(document.total),
        issued_on: format_date(document.issued_on, locale),
        valid_until: document.valid_until.map(|date| format_date(date, locale)),
        notes: document.notes.clone(),
    }
}

fn resolve_patient(patient: &PatientRecord) -> ResolvedPatient {
    ResolvedPatient {
        first_name: patient.first_name.clone(),
        last_name: patient.last_name.clone(),
        full_name: full_name(&patient.first_name, &patient.last_name),
        email: patient.email.clone(),
    }
}

fn resolve_item(item: &DocumentItemRecord) -> ResolvedItem {
    ResolvedItem {
        position: item.position,
        description: item.description.clone(),
        quantity: item.quantity,
        base_price: format_currency(item.base_price),
        discount: format_currency(item.discount),
        final_price: format_currency(item.final_price),
    }
}

fn full_name(first_name: &str, last_name: &str) -> String {
    let name = format!("{} {}", first_name.trim(), last_name.trim());
    let name = name.trim();

    if name.is_empty() {
        MISSING_NAME.to_string()
    } else {
        name.to_string()
    }
}
