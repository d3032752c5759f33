//! Settings service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{domain::notifications::render::TemplateValidationError, secrets::OpenBaoError};

#[derive(Debug, Error)]
pub enum SettingsServiceError {
    #[error(transparent)]
    InvalidTemplate(#[from] TemplateValidationError),

    #[error("{0:?} is not a #rgb or #rrggbb colour")]
    InvalidColor(String),

    #[error("failed to encrypt SMTP password")]
    Cipher(#[source] OpenBaoError),

    #[error("settings already exist")]
    AlreadyExists,

    #[error("settings not found")]
    NotFound,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SettingsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::ForeignKeyViolation | ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
