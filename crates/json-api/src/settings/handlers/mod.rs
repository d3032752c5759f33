//! Settings Handlers

pub(crate) mod branding;
pub(crate) mod email_template;
pub(crate) mod page_template;
pub(crate) mod smtp;
