//! Access Links
//!
//! Password-protected public links that share a frozen snapshot of a quote or
//! prevention document.

pub mod data;
pub mod errors;
pub mod password;
pub mod records;
pub(crate) mod repository;
pub mod service;
pub mod token;

pub use errors::AccessLinksServiceError;
pub use service::*;
