//! Update Document Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    documents::{
        errors::into_status_error,
        models::{DocumentResponse, UpdateDocumentRequest},
    },
    extensions::*,
    responses::Data,
    state::State,
};

/// Update Document
///
/// Links already issued for the document keep showing their snapshot.
#[endpoint(
    tags("documents"),
    summary = "Update Document",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Document updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Document not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "documents.update",
    skip(document, json, depot),
    fields(
        tenant_uuid = tracing::field::Empty,
        document_uuid = tracing::field::Empty,
        items_replaced = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    document: PathParam<Uuid>,
    json: JsonBody<UpdateDocumentRequest>,
    depot: &mut Depot,
) -> Result<Json<Data<DocumentResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let document = document.into_inner();
    let update = json.into_inner().into_update()?;

    let span = tracing::Span::current();

    span.record("tenant_uuid", tracing::field::display(tenant));
    span.record("document_uuid", tracing::field::display(document));
    span.record("items_replaced", update.items.is_some());

    let bundle = state
        .app
        .documents
        .update_document(tenant, document.into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(Data::new(bundle.into())))
}
