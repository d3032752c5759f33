//! Domain Concerns

pub mod access_links;
pub mod branding;
pub mod content;
pub mod documents;
pub mod locale;
pub mod notifications;
pub mod settings;
pub mod tenants;
