//! Document Handlers

pub(crate) mod create;
pub(crate) mod get;
pub(crate) mod preview;
pub(crate) mod update;
