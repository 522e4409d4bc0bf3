use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::api::routes::into_response_error;
use crate::api::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateOrganizationResponse {
    pub organization_id: String,
    pub message: String,
}

/// Registers an organization and returns the generated id. The id is the
/// only handle for uploads and chat, so clients must store it.
pub async fn create_organization(
    State(state): State<AppState>,
    Json(request): Json<CreateOrganizationRequest>,
) -> Result<Json<CreateOrganizationResponse>, (StatusCode, String)> {
    let org = state
        .organizations
        .register(&request.name)
        .map_err(into_response_error)?;

    Ok(Json(CreateOrganizationResponse {
        organization_id: org.id,
        message: "Organization created".to_string(),
    }))
}
