//! Content Packages
//!
//! Frozen, pre-formatted snapshots of a document that public viewers and
//! staff previews render from.

pub mod format;
pub mod package;
pub mod records;
pub(crate) mod repository;

pub use package::{ContentPackage, build_content_package};
