//! Create Access Link Handlers

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use tracing::info;

use tq_app::domain::access_links::records::LinkChannel;

use crate::{
    access_links::{
        errors::into_status_error,
        models::{CreateAccessLinkRequest, IssuedAccessLinkResponse},
    },
    extensions::*,
    responses::Data,
    state::State,
};

#[tracing::instrument(
    name = "access_links.create",
    skip(request, depot, res),
    fields(
        tenant_uuid = tracing::field::Empty,
        document_uuid = %request.document_uuid
    ),
    err
)]
async fn create(
    channel: LinkChannel,
    request: CreateAccessLinkRequest,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Data<IssuedAccessLinkResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    tracing::Span::current().record("tenant_uuid", tracing::field::display(tenant));

    let issued = state
        .app
        .access_links
        .create_link(tenant, request.into_new_link(channel)?)
        .await
        .map_err(into_status_error)?;

    info!(link_uuid = %issued.link.uuid, "access link created and emailed");

    res.status_code(StatusCode::CREATED);

    Ok(Json(Data::new(issued.into())))
}

/// Create Public Quote
///
/// Freezes a quote into a new link and emails it to the patient. Nothing is
/// kept when the email cannot be sent.
#[endpoint(
    tags("public-quotes"),
    summary = "Create Public Quote",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Link created and emailed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request or not a quote"),
        (status_code = StatusCode::NOT_FOUND, description = "Document or template not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Email is not configured or has no recipient"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Email could not be sent"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn public_quote(
    json: JsonBody<CreateAccessLinkRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Data<IssuedAccessLinkResponse>>, StatusError> {
    create(LinkChannel::PublicQuote, json.into_inner(), depot, res).await
}

/// Create Landing Page
///
/// Freezes a quote or prevention into a new link and emails it to the
/// patient. Nothing is kept when the email cannot be sent.
#[endpoint(
    tags("landing-pages"),
    summary = "Create Landing Page",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Link created and emailed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::NOT_FOUND, description = "Document or template not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Email is not configured or has no recipient"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Email could not be sent"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn landing_page(
    json: JsonBody<CreateAccessLinkRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Data<IssuedAccessLinkResponse>>, StatusError> {
    create(LinkChannel::LandingPage, json.into_inner(), depot, res).await
}
