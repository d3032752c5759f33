//! Authentication
//!
//! Bearer API tokens that identify the tenant behind a staff request.

mod errors;
mod models;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use service::*;
pub use token::*;
