//! Page Template Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use tq_app::domain::{content::records::PageTemplateRecord, settings::data::NewPageTemplate};

use crate::{extensions::*, responses::Data, settings::errors::into_status_error, state::State};

/// Create Page Template Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreatePageTemplateRequest {
    pub name: String,

    /// Layout definition handed to the renderer as-is
    pub definition: Value,

    /// Make this the template used when a link names none
    #[serde(default)]
    pub is_default: bool,
}

impl From<CreatePageTemplateRequest> for NewPageTemplate {
    fn from(request: CreatePageTemplateRequest) -> Self {
        Self {
            name: request.name,
            definition: request.definition,
            is_default: request.is_default,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PageTemplateResponse {
    pub uuid: Uuid,
    pub name: String,
    pub is_default: bool,
    pub created_at: String,
}

impl From<PageTemplateRecord> for PageTemplateResponse {
    fn from(template: PageTemplateRecord) -> Self {
        Self {
            uuid: template.uuid.into(),
            name: template.name,
            is_default: template.is_default,
            created_at: template.created_at.to_string(),
        }
    }
}

/// Create Page Template
#[endpoint(
    tags("settings"),
    summary = "Create Page Template",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Template created"),
        (status_code = StatusCode::CONFLICT, description = "Another default template was saved concurrently"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePageTemplateRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Data<PageTemplateResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let template = state
        .app
        .settings
        .create_page_template(tenant, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(Data::new(template.into())))
}
