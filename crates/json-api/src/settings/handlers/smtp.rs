//! SMTP Settings Handler

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use zeroize::Zeroizing;

use tq_app::domain::{
    notifications::records::SmtpSettingsRecord, settings::data::SmtpSettingsInput,
};

use crate::{extensions::*, responses::Data, settings::errors::into_status_error, state::State};

/// SMTP Settings Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct SmtpSettingsRequest {
    pub host: String,
    pub port: u16,

    /// Implicit TLS instead of STARTTLS
    #[serde(default)]
    pub secure: bool,

    pub username: String,

    /// Encrypted before it is stored
    pub password: String,

    pub from_address: String,
    pub from_name: Option<String>,
}

impl fmt::Debug for SmtpSettingsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettingsRequest")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .finish_non_exhaustive()
    }
}

impl From<SmtpSettingsRequest> for SmtpSettingsInput {
    fn from(request: SmtpSettingsRequest) -> Self {
        Self {
            host: request.host,
            port: request.port,
            secure: request.secure,
            username: request.username,
            password: Zeroizing::new(request.password),
            from_address: request.from_address,
            from_name: request.from_name,
        }
    }
}

/// SMTP settings, without the password
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SmtpSettingsResponse {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub username: String,
    pub from_address: String,
    pub from_name: Option<String>,
    pub updated_at: String,
}

impl From<SmtpSettingsRecord> for SmtpSettingsResponse {
    fn from(settings: SmtpSettingsRecord) -> Self {
        Self {
            host: settings.host,
            port: settings.port,
            secure: settings.secure,
            username: settings.username,
            from_address: settings.from_address,
            from_name: settings.from_name,
            updated_at: settings.updated_at.to_string(),
        }
    }
}

/// Save SMTP Settings
#[endpoint(
    tags("settings"),
    summary = "Save SMTP Settings",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Settings saved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Password could not be encrypted"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SmtpSettingsRequest>,
    depot: &mut Depot,
) -> Result<Json<Data<SmtpSettingsResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let settings = state
        .app
        .settings
        .save_smtp_settings(tenant, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(tenant_uuid = %tenant, host = %settings.host, "saved smtp settings");

    Ok(Json(Data::new(settings.into())))
}
