//! Public Link Handlers

pub(crate) mod approve;
pub(crate) mod mark_viewed;
pub(crate) mod open;
