//! Settings
//!
//! Per-tenant SMTP credentials, email templates, page templates and branding.

pub mod data;
pub mod errors;
pub mod service;

pub use errors::SettingsServiceError;
pub use service::*;
