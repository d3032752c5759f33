//! Patients

pub(crate) mod create;
