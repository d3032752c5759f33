//! List Access Links Handlers

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use tq_app::domain::access_links::records::LinkChannel;

use crate::{
    access_links::{errors::into_status_error, models::AccessLinkResponse},
    extensions::*,
    responses::Data,
    state::State,
};

async fn list(
    channel: LinkChannel,
    document: Uuid,
    depot: &mut Depot,
) -> Result<Json<Data<Vec<AccessLinkResponse>>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let links = state
        .app
        .access_links
        .list_links_for_document(tenant, channel, document.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(Data::new(
        links.into_iter().map(AccessLinkResponse::from).collect(),
    )))
}

/// List Public Quotes
///
/// Active public quote links for a quote, newest first.
#[endpoint(
    tags("public-quotes"),
    summary = "List Public Quotes",
    security(("bearer_auth" = []))
)]
pub(crate) async fn by_quote(
    document: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Data<Vec<AccessLinkResponse>>>, StatusError> {
    list(LinkChannel::PublicQuote, document.into_inner(), depot).await
}

/// List Landing Pages
///
/// Active landing page links for a document, newest first.
#[endpoint(
    tags("landing-pages"),
    summary = "List Landing Pages",
    security(("bearer_auth" = []))
)]
pub(crate) async fn by_document(
    document: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Data<Vec<AccessLinkResponse>>>, StatusError> {
    list(LinkChannel::LandingPage, document.into_inner(), depot).await
}
