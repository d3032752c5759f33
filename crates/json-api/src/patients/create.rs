//! Create Patient Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tq_app::domain::documents::data::NewPatient;

use crate::{
    documents::{errors::into_status_error, models::PatientResponse},
    extensions::*,
    responses::Data,
    state::State,
};

/// Create Patient Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreatePatientRequest {
    pub uuid: Uuid,
    pub first_name: String,
    pub last_name: String,

    /// Where access links are emailed unless a link names another recipient
    pub email: Option<String>,
}

impl From<CreatePatientRequest> for NewPatient {
    fn from(request: CreatePatientRequest) -> Self {
        Self {
            uuid: request.uuid.into(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
        }
    }
}

/// Create Patient
#[endpoint(
    tags("patients"),
    summary = "Create Patient",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Patient created"),
        (status_code = StatusCode::CONFLICT, description = "Patient already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePatientRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<Data<PatientResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let patient = state
        .app
        .documents
        .create_patient(tenant, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(Data::new(patient.into())))
}
