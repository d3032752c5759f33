//! Page Template Records

use jiff::Timestamp;
use serde_json::{Value, json};

use crate::uuids::TypedUuid;

/// Page Template UUID
pub type PageTemplateUuid = TypedUuid<PageTemplateRecord>;

/// Page Template Record
#[derive(Debug, Clone, PartialEq)]
pub struct PageTemplateRecord {
    pub uuid: PageTemplateUuid,
    pub name: String,

    /// Opaque layout definition consumed by the renderer.
    pub definition: Value,

    pub is_default: bool,
    pub created_at: Timestamp,
}

/// Layout used when a tenant has not configured a default template.
#[must_use]
pub fn builtin_template() -> Value {
    json!({
        "name": "default",
        "sections": [
            { "type": "header" },
            { "type": "patient" },
            { "type": "items" },
            { "type": "totals" },
            { "type": "notes" },
        ],
    })
}
