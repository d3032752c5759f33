//! Preview Document Content Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    access_links::errors::into_status_error, extensions::*, responses::Data, state::State,
};

/// Preview Document Content
///
/// Builds the content package a new link would freeze, without creating a
/// link. `template` picks a page template; the tenant default is used
/// otherwise.
#[endpoint(
    tags("documents"),
    summary = "Preview Document Content",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Content package"),
        (status_code = StatusCode::NOT_FOUND, description = "Document or template not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    document: PathParam<Uuid>,
    template: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<Data<Value>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let package = state
        .app
        .access_links
        .preview_content(
            tenant,
            document.into_inner().into(),
            template.into_inner().map(Into::into),
        )
        .await
        .map_err(into_status_error)?;

    let content = serde_json::to_value(&package).or_500("failed to serialise content package")?;

    Ok(Json(Data::new(content)))
}
