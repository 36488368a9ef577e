use axum::{extract::State, Json};

use crate::telemetry::{self, IssPosition};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/position",
    tag = "telemetry",
    responses(
        (status = 200, description = "Live position", body = IssPosition),
        (status = 502, description = "Position feed unavailable", body = ErrorResponse)
    )
)]
pub async fn position(State(state): State<AppState>) -> ApiResult<Json<IssPosition>> {
    let telemetry = &state.config.telemetry;
    let url = telemetry
        .position_url
        .replace("{norad_id}", &state.service.norad_id().to_string());

    let position = telemetry::fetch_position(&state.client, &url, telemetry.request_timeout).await?;
    Ok(Json(position))
}
