//! Mark Prevention Viewed Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use tq_app::domain::{access_links::records::LinkChannel, documents::records::DocumentAction};

use crate::{
    access_links::errors::into_status_error,
    extensions::*,
    observability::PublicLinkOutcome,
    public::models::{UnlockRequest, ViewedResponse, record_outcome},
    responses::Data,
    state::State,
};

/// Mark Landing Page Viewed
///
/// Only landing pages that share a prevention can be marked as viewed.
/// Repeated calls succeed without changing anything.
#[endpoint(
    tags("public"),
    summary = "Mark Landing Page Viewed",
    responses(
        (status_code = StatusCode::OK, description = "Prevention marked as viewed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Password missing or not a prevention"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid password"),
        (status_code = StatusCode::NOT_FOUND, description = "Link not found or expired"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn landing_page(
    token: PathParam<String>,
    json: JsonBody<UnlockRequest>,
    depot: &mut Depot,
) -> Result<Json<Data<ViewedResponse>>, StatusError> {
    let channel = LinkChannel::LandingPage;
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let password = json.into_inner().into_password(channel)?;

    let result = state
        .app
        .access_links
        .apply_action(
            channel,
            &token.into_inner(),
            &password,
            DocumentAction::MarkViewed,
        )
        .await;

    record_outcome(channel, &result, PublicLinkOutcome::MarkedViewed);

    let outcome = result.map_err(into_status_error)?;

    Ok(Json(Data::new(outcome.into())))
}
