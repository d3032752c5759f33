//! Email Template Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use tq_app::domain::{
    documents::records::DocumentKind,
    notifications::{data::NewEmailTemplate, records::EmailTemplateRecord},
};

use crate::{extensions::*, responses::Data, settings::errors::into_status_error, state::State};

/// Email Template Request
///
/// The body must contain `$PUBLIC_LINK$` and `$PASSWORD_BLOCK$`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct EmailTemplateRequest {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct EmailTemplateResponse {
    /// Document kind the template is used for
    pub kind: String,
    pub subject: String,
    pub body: String,
    pub updated_at: String,
}

impl From<EmailTemplateRecord> for EmailTemplateResponse {
    fn from(template: EmailTemplateRecord) -> Self {
        Self {
            kind: template.kind.to_string(),
            subject: template.subject,
            body: template.body,
            updated_at: template.updated_at.to_string(),
        }
    }
}

/// Save Email Template
///
/// Replaces the template sent with new links for one document kind.
#[endpoint(
    tags("settings"),
    summary = "Save Email Template",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Template saved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown kind or invalid template"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    kind: PathParam<String>,
    json: JsonBody<EmailTemplateRequest>,
    depot: &mut Depot,
) -> Result<Json<Data<EmailTemplateResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let kind = kind
        .into_inner()
        .parse::<DocumentKind>()
        .map_err(|source| StatusError::bad_request().brief(source.to_string()))?;

    let request = json.into_inner();

    let template = state
        .app
        .settings
        .save_email_template(
            tenant,
            NewEmailTemplate {
                kind,
                subject: request.subject,
                body: request.body,
            },
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(Data::new(template.into())))
}
