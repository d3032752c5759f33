//! Document Errors

use salvo::http::StatusError;
use tracing::error;

use tq_app::domain::documents::DocumentsServiceError;

pub(crate) fn into_status_error(error: DocumentsServiceError) -> StatusError {
    match error {
        DocumentsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Document already exists")
        }
        DocumentsServiceError::NotFound => StatusError::not_found().brief("Document not found"),
        DocumentsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Referenced patient does not exist")
        }
        DocumentsServiceError::MissingRequiredData | DocumentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid document payload")
        }
        DocumentsServiceError::Sql(source) => {
            error!("document storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
