//! Notification errors.

use thiserror::Error;

use crate::{domain::notifications::mailer::MailerError, secrets::OpenBaoError};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("SMTP settings are not configured")]
    SmtpNotConfigured,

    #[error("no email template is configured for this document kind")]
    TemplateMissing,

    #[error("failed to decrypt SMTP credentials")]
    Cipher(#[source] OpenBaoError),

    #[error("failed to render email")]
    Render(#[source] tera::Error),

    #[error("failed to deliver email")]
    Delivery(#[source] MailerError),

    #[error("storage error")]
    Sql(#[source] sqlx::Error),
}

impl From<sqlx::Error> for NotificationError {
    fn from(error: sqlx::Error) -> Self {
        Self::Sql(error)
    }
}
