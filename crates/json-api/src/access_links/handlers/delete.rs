//! Revoke Access Link Handlers

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use tq_app::domain::access_links::records::LinkChannel;

use crate::{
    access_links::{errors::into_status_error, models::AccessLinkResponse},
    extensions::*,
    responses::Data,
    state::State,
};

async fn revoke(
    channel: LinkChannel,
    link: Uuid,
    depot: &mut Depot,
) -> Result<Json<Data<AccessLinkResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let revoked = state
        .app
        .access_links
        .revoke_link(tenant, channel, link.into())
        .await
        .map_err(into_status_error)?;

    info!(%tenant, link_uuid = %revoked.uuid, %channel, "access link revoked");

    Ok(Json(Data::new(revoked.into())))
}

/// Revoke Public Quote
///
/// Deactivates the link for good. It cannot be re-enabled.
#[endpoint(
    tags("public-quotes"),
    summary = "Revoke Public Quote",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Link revoked"),
        (status_code = StatusCode::NOT_FOUND, description = "Link not found"),
    ),
)]
pub(crate) async fn public_quote(
    link: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Data<AccessLinkResponse>>, StatusError> {
    revoke(LinkChannel::PublicQuote, link.into_inner(), depot).await
}

/// Revoke Landing Page
///
/// Deactivates the link for good. It cannot be re-enabled.
#[endpoint(
    tags("landing-pages"),
    summary = "Revoke Landing Page",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Link revoked"),
        (status_code = StatusCode::NOT_FOUND, description = "Link not found"),
    ),
)]
pub(crate) async fn landing_page(
    link: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Data<AccessLinkResponse>>, StatusError> {
    revoke(LinkChannel::LandingPage, link.into_inner(), depot).await
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tq_app::domain::access_links::{
        AccessLinksServiceError, MockAccessLinksService, records::AccessLinkUuid,
    };

    use crate::test_helpers::{TEST_TENANT_UUID, make_link, staff_service, state_with_access_links};

    use super::*;

    fn make_service(access_links: MockAccessLinksService) -> Service {
        staff_service(
            state_with_access_links(access_links),
            Router::new()
                .push(Router::with_path("tq/public-quotes/{link}").delete(public_quote))
                .push(Router::with_path("tq/landing-pages/{link}").delete(landing_page)),
        )
    }

    #[tokio::test]
    async fn test_revoke_returns_inactive_link() -> TestResult {
        let uuid = AccessLinkUuid::new();
        let mut access_links = MockAccessLinksService::new();

        access_links
            .expect_revoke_link()
            .once()
            .withf(move |tenant, channel, link| {
                *tenant == TEST_TENANT_UUID && *channel == LinkChannel::LandingPage && *link == uuid
            })
            .return_once(move |_, channel, _| {
                let mut link = make_link(uuid, channel);
                link.active = false;

                Ok(link)
            });

        let mut res = TestClient::delete(format!("http://example.com/tq/landing-pages/{uuid}"))
            .send(&make_service(access_links))
            .await;

        let body: Data<AccessLinkResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.data.uuid, uuid.into_uuid());
        assert!(!body.data.active);

        Ok(())
    }

    #[tokio::test]
    async fn test_revoke_on_wrong_channel_returns_404() -> TestResult {
        let mut access_links = MockAccessLinksService::new();

        access_links
            .expect_revoke_link()
            .once()
            .withf(|_, channel, _| *channel == LinkChannel::PublicQuote)
            .return_once(|_, _, _| Err(AccessLinksServiceError::NotFound));

        let res = TestClient::delete(format!(
            "http://example.com/tq/public-quotes/{}",
            AccessLinkUuid::new()
        ))
        .send(&make_service(access_links))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
