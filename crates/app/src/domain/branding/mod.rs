//! Tenant Branding

pub mod data;
pub mod records;
pub(crate) mod repository;

pub use records::TenantBranding;
