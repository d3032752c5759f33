//! Create Document Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    documents::{
        errors::into_status_error,
        models::{CreateDocumentRequest, DocumentResponse},
    },
    extensions::*,
    responses::Data,
    state::State,
};

/// Create Document
///
/// Creates a quote or prevention together with its line items.
#[endpoint(
    tags("documents"),
    summary = "Create Document",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Document created"),
        (status_code = StatusCode::CONFLICT, description = "Document already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateDocumentRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Data<DocumentResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let document = json.into_inner().into_new_document()?;

    let bundle = state
        .app
        .documents
        .create_document(tenant, document)
        .await
        .map_err(into_status_error)?;

    res.add_header(
        LOCATION,
        format!("/tq/documents/{}", bundle.document.uuid),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    Ok(Json(Data::new(bundle.into())))
}
