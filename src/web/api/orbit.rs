use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::elements::Provenance;
use crate::predict::OrbitInfo;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct OrbitResponse {
    pub orbit: OrbitInfo,
    pub elements: Provenance,
    pub degraded: bool,
}

#[utoipa::path(
    get,
    path = "/api/orbit",
    tag = "orbit",
    responses(
        (status = 200, description = "Orbit summary", body = OrbitResponse),
        (status = 422, description = "Element set unusable", body = ErrorResponse),
        (status = 503, description = "Orbital data unavailable", body = ErrorResponse)
    )
)]
pub async fn orbit(State(state): State<AppState>) -> ApiResult<Json<OrbitResponse>> {
    let (orbit, elements) = state.service.orbit_info().await?;
    let degraded = elements.is_degraded();
    Ok(Json(OrbitResponse {
        orbit,
        elements,
        degraded,
    }))
}
