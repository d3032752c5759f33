//! Approve Quote Handlers

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;

use tq_app::domain::{access_links::records::LinkChannel, documents::records::DocumentAction};

use crate::{
    access_links::errors::into_status_error,
    extensions::*,
    observability::PublicLinkOutcome,
    public::models::{ApprovalResponse, UnlockRequest, record_outcome},
    responses::Data,
    state::State,
};

async fn approve(
    channel: LinkChannel,
    token: &str,
    request: UnlockRequest,
    depot: &mut Depot,
) -> Result<Json<Data<ApprovalResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let password = request.into_password(channel)?;

    let result = state
        .app
        .access_links
        .apply_action(channel, token, &password, DocumentAction::Approve)
        .await;

    record_outcome(channel, &result, PublicLinkOutcome::Approved);

    let outcome = result.map_err(into_status_error)?;

    info!(channel = %channel, document_number = %outcome.document_number, "quote approved");

    Ok(Json(Data::new(outcome.into())))
}

/// Approve Public Quote
#[endpoint(
    tags("public"),
    summary = "Approve Public Quote",
    responses(
        (status_code = StatusCode::OK, description = "Quote approved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Password missing"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid password"),
        (status_code = StatusCode::NOT_FOUND, description = "Link not found or expired"),
        (status_code = StatusCode::CONFLICT, description = "Quote can no longer be approved"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn public_quote(
    token: PathParam<String>,
    json: JsonBody<UnlockRequest>,
    depot: &mut Depot,
) -> Result<Json<Data<ApprovalResponse>>, StatusError> {
    approve(
        LinkChannel::PublicQuote,
        &token.into_inner(),
        json.into_inner(),
        depot,
    )
    .await
}

/// Approve Landing Page Quote
///
/// Only landing pages that share a quote can be approved.
#[endpoint(
    tags("public"),
    summary = "Approve Landing Page Quote",
    responses(
        (status_code = StatusCode::OK, description = "Quote approved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Password missing or not a quote"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid password"),
        (status_code = StatusCode::NOT_FOUND, description = "Link not found or expired"),
        (status_code = StatusCode::CONFLICT, description = "Quote can no longer be approved"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn landing_page(
    token: PathParam<String>,
    json: JsonBody<UnlockRequest>,
    depot: &mut Depot,
) -> Result<Json<Data<ApprovalResponse>>, StatusError> {
    approve(
        LinkChannel::LandingPage,
        &token.into_inner(),
        json.into_inner(),
        depot,
    )
    .await
}
