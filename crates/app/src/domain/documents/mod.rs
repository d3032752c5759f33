//! Documents
//!
//! Patients and the quote / prevention documents that access links share.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::DocumentsServiceError;
pub use service::*;
