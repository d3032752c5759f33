//! Shared domain, persistence and delivery modules for password-protected
//! public document links.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod secrets;

#[cfg(test)]
mod test;

mod uuids;
