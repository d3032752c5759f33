//! Access links service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    access_links::password::{PasswordError, PasswordPolicyError},
    documents::records::{DocumentKind, DocumentStatus},
    notifications::NotificationError,
};

#[derive(Debug, Error)]
pub enum AccessLinksServiceError {
    /// Unknown, revoked, expired or wrong-channel links all look the same.
    #[error("link not found or expired")]
    NotFound,

    #[error("page template not found")]
    TemplateNotFound,

    #[error("invalid password")]
    InvalidPassword,

    #[error("document kind {0} cannot be shared through this channel")]
    ChannelMismatch(DocumentKind),

    #[error("action is not supported for {0} documents")]
    UnsupportedAction(DocumentKind),

    #[error("document is already {0}")]
    Conflict(DocumentStatus),

    #[error("patient has no email address")]
    RecipientMissing,

    #[error("SMTP settings are not configured")]
    SmtpNotConfigured,

    #[error("no email template is configured for {0} documents")]
    EmailTemplateMissing(DocumentKind),

    #[error("failed to send {kind} email")]
    EmailFailed {
        kind: DocumentKind,

        #[source]
        source: NotificationError,
    },

    #[error("link already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("link password rejected: {0}")]
    PasswordRejected(#[from] PasswordPolicyError),

    #[error("password processing error")]
    Password(#[from] PasswordError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl AccessLinksServiceError {
    /// Stable code surfaced to staff clients.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::RecipientMissing => Some("PATIENT_EMAIL_MISSING"),
            Self::PasswordRejected(_) => Some("INVALID_LINK_PASSWORD"),
            Self::SmtpNotConfigured => Some("SMTP_NOT_CONFIGURED"),
            Self::EmailTemplateMissing(_) => Some("EMAIL_TEMPLATE_MISSING"),
            Self::EmailFailed {
                kind: DocumentKind::Quote,
                ..
            } => Some("QUOTE_EMAIL_FAILED"),
            Self::EmailFailed {
                kind: DocumentKind::Prevention,
                ..
            } => Some("PREVENTION_EMAIL_FAILED"),
            _ => None,
        }
    }

    pub(crate) fn from_notification(kind: DocumentKind, error: NotificationError) -> Self {
        match error {
            NotificationError::SmtpNotConfigured => Self::SmtpNotConfigured,
            NotificationError::TemplateMissing => Self::EmailTemplateMissing(kind),
            source => Self::EmailFailed { kind, source },
        }
    }
}

impl From<Error> for AccessLinksServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
