use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::PredictError;

pub const DEFAULT_SCAN_WINDOW: Duration = Duration::hours(12);
pub const DEFAULT_SCAN_STEP: Duration = Duration::seconds(10);

/// The next interval during which a satellite is above the horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PassWindow {
    /// Unix seconds
    pub rise_time: i64,
    pub duration_seconds: i64,
}

impl PassWindow {
    pub fn between(rise: DateTime<Utc>, set: DateTime<Utc>) -> Self {
        let seconds = (set - rise).num_milliseconds() as f64 / 1000.0;
        Self {
            rise_time: rise.timestamp(),
            duration_seconds: seconds.round().max(0.0) as i64,
        }
    }

    pub fn rise_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.rise_time, 0)
    }
}

/// Time span scanned for a pass and the sampling step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSearch {
    window: Duration,
    step: Duration,
}

impl PassSearch {
    pub fn new(window: Duration, step: Duration) -> Result<Self, PredictError> {
        if step <= Duration::zero() {
            return Err(PredictError::InvalidSearch(format!(
                "step must be positive, got {} s",
                step.num_seconds()
            )));
        }
        if window < Duration::zero() {
            return Err(PredictError::InvalidSearch(format!(
                "window must not be negative, got {} s",
                window.num_seconds()
            )));
        }
        Ok(Self { window, step })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn step(&self) -> Duration {
        self.step
    }
}

impl Default for PassSearch {
    fn default() -> Self {
        Self {
            window: DEFAULT_SCAN_WINDOW,
            step: DEFAULT_SCAN_STEP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LookAngles {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub range_km: f64,
}

/// Orbit summary derived from an element set
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrbitInfo {
    pub norad_id: u64,
    pub name: Option<String>,
    pub orbit_number: Option<u64>,
    pub inclination_deg: Option<f64>,
    pub period_minutes: Option<f64>,
    pub revs_per_day: Option<f64>,
    pub epoch: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
