//! Branding Handlers

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    responses::Data,
    settings::{
        errors::into_status_error,
        models::{BrandingRequest, BrandingResponse},
    },
    state::State,
};

/// Get Branding
///
/// Returns the stored branding, or the default colours when none is set.
#[endpoint(
    tags("settings"),
    summary = "Get Branding",
    security(("bearer_auth" = []))
)]
pub(crate) async fn get(depot: &mut Depot) -> Result<Json<Data<BrandingResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let branding = state
        .app
        .settings
        .get_branding(tenant)
        .await
        .map_err(into_status_error)?;

    Ok(Json(Data::new(branding.into())))
}

/// Update Branding
#[endpoint(
    tags("settings"),
    summary = "Update Branding",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Branding saved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn update(
    json: JsonBody<BrandingRequest>,
    depot: &mut Depot,
) -> Result<Json<Data<BrandingResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let branding = state
        .app
        .settings
        .save_branding(tenant, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(Data::new(branding.into())))
}
