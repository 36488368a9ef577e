//! Live position of the station as reported by a public tracking feed.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("position request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("position feed returned HTTP status {0}")]
    Status(u16),
}

/// Sub-satellite point and motion at `timestamp` (Unix seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IssPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// km above the ellipsoid
    pub altitude: f64,
    /// km/h
    pub velocity: f64,
    pub timestamp: i64,
}

pub async fn fetch_position(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<IssPosition, TelemetryError> {
    let response = client.get(url).timeout(timeout).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(TelemetryError::Status(status.as_u16()));
    }

    Ok(response.json::<IssPosition>().await?)
}
