//! Settings Errors

use salvo::http::StatusError;
use tracing::error;

use tq_app::domain::settings::SettingsServiceError;

pub(crate) fn into_status_error(error: SettingsServiceError) -> StatusError {
    match error {
        SettingsServiceError::InvalidTemplate(source) => StatusError::bad_request()
            .brief(source.to_string())
            .detail("INVALID_EMAIL_TEMPLATE"),
        SettingsServiceError::InvalidColor(color) => StatusError::bad_request()
            .brief(format!("{color:?} is not a #rgb or #rrggbb colour"))
            .detail("INVALID_COLOR"),
        SettingsServiceError::Cipher(source) => {
            error!("failed to encrypt smtp password: {source}");

            StatusError::bad_gateway().brief("Failed to protect SMTP password")
        }
        SettingsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Settings already exist")
        }
        SettingsServiceError::NotFound => StatusError::not_found(),
        SettingsServiceError::MissingRequiredData | SettingsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid settings payload")
        }
        SettingsServiceError::Sql(source) => {
            error!("settings storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use tq_app::domain::notifications::render::TemplateValidationError;

    use super::*;

    #[test]
    fn template_validation_errors_explain_themselves() {
        let error = into_status_error(SettingsServiceError::InvalidTemplate(
            TemplateValidationError::MissingPlaceholder("$PUBLIC_LINK$".to_string()),
        ));

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.brief, "email body must contain $PUBLIC_LINK$");
        assert_eq!(error.detail.as_deref(), Some("INVALID_EMAIL_TEMPLATE"));
    }

    #[test]
    fn invalid_colors_are_bad_requests() {
        let error = into_status_error(SettingsServiceError::InvalidColor("red".to_string()));

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.brief, "\"red\" is not a #rgb or #rrggbb colour");
        assert_eq!(error.detail.as_deref(), Some("INVALID_COLOR"));
    }

    #[test]
    fn check_violations_are_bad_requests() {
        let error = into_status_error(SettingsServiceError::InvalidData);

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
    }
}
