//! Access Links
//!
//! Staff management of public quote and landing page links. Both channels
//! share one implementation; the route decides the channel.

pub(crate) mod errors;
mod handlers;
mod models;

pub(crate) use handlers::*;
