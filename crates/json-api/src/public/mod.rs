//! Public Links
//!
//! Endpoints a patient reaches from an emailed link. There is no bearer
//! token here: the access token in the path and the password in the body are
//! the only credentials.

mod handlers;
mod models;

pub(crate) use handlers::*;
