//! Access Link Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use tq_app::domain::access_links::AccessLinksServiceError;

pub(crate) fn into_status_error(error: AccessLinksServiceError) -> StatusError {
    let code = error.code();

    let status = match error {
        AccessLinksServiceError::NotFound => {
            StatusError::not_found().brief("Link not found or expired")
        }
        AccessLinksServiceError::TemplateNotFound => {
            StatusError::not_found().brief("Page template not found")
        }
        AccessLinksServiceError::InvalidPassword => {
            StatusError::unauthorized().brief("Invalid password")
        }
        AccessLinksServiceError::ChannelMismatch(kind) => StatusError::bad_request().brief(
            format!("A {kind} document cannot be shared through this link type"),
        ),
        AccessLinksServiceError::UnsupportedAction(kind) => {
            StatusError::bad_request().brief(format!("Action is not available for a {kind}"))
        }
        AccessLinksServiceError::Conflict(status) => {
            StatusError::conflict().brief(format!("Document is already {status}"))
        }
        AccessLinksServiceError::RecipientMissing => StatusError::unprocessable_entity()
            .brief("Patient has no email address to send the link to"),
        AccessLinksServiceError::SmtpNotConfigured => {
            StatusError::unprocessable_entity().brief("SMTP is not configured")
        }
        AccessLinksServiceError::EmailTemplateMissing(kind) => StatusError::unprocessable_entity()
            .brief(format!("No email template is configured for {kind} documents")),
        AccessLinksServiceError::EmailFailed { kind, source } => {
            warn!("failed to send {kind} access link email: {source}");

            StatusError::bad_gateway().brief("Failed to send email, try again")
        }
        AccessLinksServiceError::AlreadyExists => {
            StatusError::conflict().brief("Link already exists")
        }
        AccessLinksServiceError::InvalidReference
        | AccessLinksServiceError::MissingRequiredData
        | AccessLinksServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid link payload")
        }
        AccessLinksServiceError::PasswordRejected(reason) => {
            StatusError::bad_request().brief(format!("Invalid link password: {reason}"))
        }
        AccessLinksServiceError::Password(source) => {
            error!("failed to process link password: {source}");

            StatusError::internal_server_error()
        }
        AccessLinksServiceError::Sql(source) => {
            error!("access link storage error: {source}");

            StatusError::internal_server_error()
        }
    };

    match code {
        Some(code) => status.detail(code),
        None => status,
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use tq_app::domain::{
        access_links::password::PasswordPolicyError,
        documents::records::{DocumentKind, DocumentStatus},
        notifications::NotificationError,
    };

    use crate::test_helpers::sql_error;

    use super::*;

    #[test]
    fn public_failures_map_to_distinct_statuses() {
        let not_found = into_status_error(AccessLinksServiceError::NotFound);
        let password = into_status_error(AccessLinksServiceError::InvalidPassword);
        let conflict =
            into_status_error(AccessLinksServiceError::Conflict(DocumentStatus::Approved));
        let unsupported =
            into_status_error(AccessLinksServiceError::UnsupportedAction(DocumentKind::Quote));

        assert_eq!(not_found.code, StatusCode::NOT_FOUND);
        assert_eq!(password.code, StatusCode::UNAUTHORIZED);
        assert_eq!(conflict.code, StatusCode::CONFLICT);
        assert_eq!(conflict.brief, "Document is already approved");
        assert_eq!(unsupported.code, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn configuration_problems_carry_their_code() {
        let smtp = into_status_error(AccessLinksServiceError::SmtpNotConfigured);
        let recipient = into_status_error(AccessLinksServiceError::RecipientMissing);

        assert_eq!(smtp.code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(smtp.detail.as_deref(), Some("SMTP_NOT_CONFIGURED"));
        assert_eq!(recipient.detail.as_deref(), Some("PATIENT_EMAIL_MISSING"));
    }

    #[test]
    fn email_failures_are_bad_gateway_with_kind_code() {
        let error = into_status_error(AccessLinksServiceError::EmailFailed {
            kind: DocumentKind::Prevention,
            source: NotificationError::Sql(sql_error()),
        });

        assert_eq!(error.code, StatusCode::BAD_GATEWAY);
        assert_eq!(error.detail.as_deref(), Some("PREVENTION_EMAIL_FAILED"));
    }

    #[test]
    fn rejected_passwords_are_bad_requests() {
        let error = into_status_error(AccessLinksServiceError::PasswordRejected(
            PasswordPolicyError::TooLong,
        ));

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.detail.as_deref(), Some("INVALID_LINK_PASSWORD"));
    }

    #[test]
    fn storage_errors_are_opaque() {
        let error = into_status_error(AccessLinksServiceError::Sql(sql_error()));

        assert_eq!(error.code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.detail, None);
    }
}
