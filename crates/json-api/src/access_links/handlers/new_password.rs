//! New Password Handlers

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use tq_app::domain::access_links::records::LinkChannel;

use crate::{
    access_links::{errors::into_status_error, models::IssuedAccessLinkResponse},
    extensions::*,
    responses::Data,
    state::State,
};

async fn rotate(
    channel: LinkChannel,
    link: Uuid,
    depot: &mut Depot,
) -> Result<Json<Data<IssuedAccessLinkResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let issued = state
        .app
        .access_links
        .rotate_password(tenant, channel, link.into())
        .await
        .map_err(into_status_error)?;

    info!(%tenant, link_uuid = %issued.link.uuid, %channel, "access link password rotated");

    Ok(Json(Data::new(issued.into())))
}

/// New Public Quote Password
///
/// Generates a new password and emails it. The old password keeps working if
/// the email fails.
#[endpoint(
    tags("public-quotes"),
    summary = "New Public Quote Password",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Password replaced and emailed"),
        (status_code = StatusCode::NOT_FOUND, description = "Link not found or revoked"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Email is not configured or has no recipient"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Email could not be sent"),
    ),
)]
pub(crate) async fn public_quote(
    link: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Data<IssuedAccessLinkResponse>>, StatusError> {
    rotate(LinkChannel::PublicQuote, link.into_inner(), depot).await
}

/// New Landing Page Password
///
/// Generates a new password and emails it. The old password keeps working if
/// the email fails.
#[endpoint(
    tags("landing-pages"),
    summary = "New Landing Page Password",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Password replaced and emailed"),
        (status_code = StatusCode::NOT_FOUND, description = "Link not found or revoked"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Email is not configured or has no recipient"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Email could not be sent"),
    ),
)]
pub(crate) async fn landing_page(
    link: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Data<IssuedAccessLinkResponse>>, StatusError> {
    rotate(LinkChannel::LandingPage, link.into_inner(), depot).await
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use tq_app::domain::{
        access_links::{AccessLinksServiceError, MockAccessLinksService, records::AccessLinkUuid},
        documents::records::DocumentKind,
        notifications::NotificationError,
    };

    use crate::test_helpers::{
        TEST_TENANT_UUID, make_issued_link, sql_error, staff_service, state_with_access_links,
    };

    use super::*;

    fn make_service(access_links: MockAccessLinksService) -> Service {
        staff_service(
            state_with_access_links(access_links),
            Router::new()
                .push(
                    Router::with_path("tq/public-quotes/{link}/new-password").post(public_quote),
                )
                .push(
                    Router::with_path("tq/landing-pages/{link}/new-password").post(landing_page),
                ),
        )
    }

    #[tokio::test]
    async fn test_rotation_returns_new_password() -> TestResult {
        let uuid = AccessLinkUuid::new();
        let mut access_links = MockAccessLinksService::new();

        access_links
            .expect_rotate_password()
            .once()
            .withf(move |tenant, channel, link| {
                *tenant == TEST_TENANT_UUID && *channel == LinkChannel::PublicQuote && *link == uuid
            })
            .return_once(move |_, channel, _| Ok(make_issued_link(uuid, channel)));

        let mut res = TestClient::post(format!(
            "http://example.com/tq/public-quotes/{uuid}/new-password"
        ))
        .send(&make_service(access_links))
        .await;

        let body: Data<IssuedAccessLinkResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.data.password, "Ab3xZ9Qr");
        assert_eq!(body.data.link.uuid, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_email_returns_502() -> TestResult {
        let mut access_links = MockAccessLinksService::new();

        access_links
            .expect_rotate_password()
            .once()
            .return_once(|_, _, _| {
                Err(AccessLinksServiceError::EmailFailed {
                    kind: DocumentKind::Prevention,
                    source: NotificationError::Sql(sql_error()),
                })
            });

        let res = TestClient::post(format!(
            "http://example.com/tq/landing-pages/{}/new-password",
            AccessLinkUuid::new()
        ))
        .send(&make_service(access_links))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_GATEWAY));

        Ok(())
    }

    #[tokio::test]
    async fn test_revoked_link_returns_404() -> TestResult {
        let mut access_links = MockAccessLinksService::new();

        access_links
            .expect_rotate_password()
            .once()
            .return_once(|_, _, _| Err(AccessLinksServiceError::NotFound));

        let res = TestClient::post(format!(
            "http://example.com/tq/landing-pages/{}/new-password",
            AccessLinkUuid::new()
        ))
        .send(&make_service(access_links))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
