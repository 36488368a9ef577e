use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::elements::Provenance;
use crate::predict::Observer;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PassQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub height_km: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PassResponse {
    /// Unix seconds, floored
    pub rise_time: i64,
    pub duration_seconds: i64,
    pub rise_at: Option<DateTime<Utc>>,
    pub elements: Provenance,
    /// Prediction used cached or bundled elements
    pub degraded: bool,
}

#[utoipa::path(
    get,
    path = "/api/pass",
    tag = "pass",
    params(
        ("lat" = f64, Query, description = "Observer latitude (degrees, -90..90)"),
        ("lon" = f64, Query, description = "Observer longitude (degrees, -180..180)"),
        ("height_km" = Option<f64>, Query, description = "Observer height above the ellipsoid (km)")
    ),
    responses(
        (status = 200, description = "Next pass above the horizon", body = PassResponse),
        (status = 400, description = "Invalid observer location", body = ErrorResponse),
        (status = 422, description = "No pass found or elements unusable", body = ErrorResponse),
        (status = 503, description = "Orbital data unavailable", body = ErrorResponse)
    )
)]
pub async fn next_pass(
    State(state): State<AppState>,
    query: Result<Query<PassQuery>, QueryRejection>,
) -> ApiResult<Json<PassResponse>> {
    let Query(query) = query.map_err(ApiError::from)?;

    let pass = match query.height_km {
        Some(height_km) => {
            let observer = Observer::new(query.lat, query.lon).with_height_km(height_km);
            state.service.next_pass_for(observer).await?
        }
        None => state.service.next_pass(query.lat, query.lon).await?,
    };
    let degraded = pass.is_degraded();

    Ok(Json(PassResponse {
        rise_time: pass.window.rise_time,
        duration_seconds: pass.window.duration_seconds,
        rise_at: pass.window.rise_at(),
        elements: pass.provenance,
        degraded,
    }))
}
