//! Get Document Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    documents::{errors::into_status_error, models::DocumentResponse},
    extensions::*,
    responses::Data,
    state::State,
};

/// Get Document
///
/// Returns the live document, which may differ from what existing links show.
#[endpoint(
    tags("documents"),
    summary = "Get Document",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    document: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Data<DocumentResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let bundle = state
        .app
        .documents
        .get_document(tenant, document.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(Data::new(bundle.into())))
}
