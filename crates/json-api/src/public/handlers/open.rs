//! Open Public Link Handlers

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use tq_app::domain::access_links::records::LinkChannel;

use crate::{
    access_links::errors::into_status_error,
    extensions::*,
    observability::PublicLinkOutcome,
    public::models::{OpenedLinkResponse, UnlockRequest, record_outcome},
    responses::Data,
    state::State,
};

async fn open(
    channel: LinkChannel,
    token: &str,
    request: UnlockRequest,
    depot: &mut Depot,
) -> Result<Json<Data<OpenedLinkResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let password = request.into_password(channel)?;

    let result = state
        .app
        .access_links
        .open_link(channel, token, &password)
        .await;

    record_outcome(channel, &result, PublicLinkOutcome::Opened);

    let opened = result.map_err(into_status_error)?;

    Ok(Json(Data::new(OpenedLinkResponse::try_from_opened(opened)?)))
}

/// Open Public Quote
///
/// Unlocks a shared quote with its password and returns the frozen content.
#[endpoint(
    tags("public"),
    summary = "Open Public Quote",
    responses(
        (status_code = StatusCode::OK, description = "Link unlocked"),
        (status_code = StatusCode::BAD_REQUEST, description = "Password missing"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid password"),
        (status_code = StatusCode::NOT_FOUND, description = "Link not found or expired"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn public_quote(
    token: PathParam<String>,
    json: JsonBody<UnlockRequest>,
    depot: &mut Depot,
) -> Result<Json<Data<OpenedLinkResponse>>, StatusError> {
    open(
        LinkChannel::PublicQuote,
        &token.into_inner(),
        json.into_inner(),
        depot,
    )
    .await
}

/// Open Landing Page
///
/// Unlocks a shared landing page with its password and returns the frozen
/// content.
#[endpoint(
    tags("public"),
    summary = "Open Landing Page",
    responses(
        (status_code = StatusCode::OK, description = "Link unlocked"),
        (status_code = StatusCode::BAD_REQUEST, description = "Password missing"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid password"),
        (status_code = StatusCode::NOT_FOUND, description = "Link not found or expired"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn landing_page(
    token: PathParam<String>,
    json: JsonBody<UnlockRequest>,
    depot: &mut Depot,
) -> Result<Json<Data<OpenedLinkResponse>>, StatusError> {
    open(
        LinkChannel::LandingPage,
        &token.into_inner(),
        json.into_inner(),
        depot,
    )
    .await
}
