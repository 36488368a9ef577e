use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::elements::Provenance;
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ElementsResponse {
    pub norad_id: u32,
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
    pub provenance: Provenance,
    pub degraded: bool,
}

#[utoipa::path(
    get,
    path = "/api/elements",
    tag = "elements",
    responses(
        (status = 200, description = "Element set currently used for predictions", body = ElementsResponse),
        (status = 503, description = "Orbital data unavailable", body = ErrorResponse)
    )
)]
pub async fn current_elements(State(state): State<AppState>) -> ApiResult<Json<ElementsResponse>> {
    let resolved = state.service.element_set().await?;
    let degraded = resolved.is_degraded();

    Ok(Json(ElementsResponse {
        norad_id: state.service.norad_id(),
        name: resolved.element_set.name,
        line1: resolved.element_set.line1,
        line2: resolved.element_set.line2,
        provenance: resolved.provenance,
        degraded,
    }))
}
