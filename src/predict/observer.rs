use serde::{Deserialize, Serialize};

use crate::predict::PredictError;

// WGS-84
const EARTH_EQUATORIAL_RADIUS_KM: f64 = 6378.137;
const EARTH_ECCENTRICITY_SQUARED: f64 = 0.00669437999014;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Observer {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub height_km: f64,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            height_km: 0.0,
        }
    }

    pub fn with_height_km(mut self, height_km: f64) -> Self {
        self.height_km = height_km;
        self
    }

    pub fn validate(&self) -> Result<(), PredictError> {
        if !self.latitude_deg.is_finite() || !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(PredictError::InvalidObserver(format!(
                "latitude {} is not within [-90, 90]",
                self.latitude_deg
            )));
        }
        if !self.longitude_deg.is_finite() || !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err(PredictError::InvalidObserver(format!(
                "longitude {} is not within [-180, 180]",
                self.longitude_deg
            )));
        }
        if !self.height_km.is_finite() {
            return Err(PredictError::InvalidObserver(format!(
                "height {} km is not finite",
                self.height_km
            )));
        }
        Ok(())
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = EARTH_EQUATORIAL_RADIUS_KM
            / (1.0 - EARTH_ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt();
        [
            (n + self.height_km) * cos_lat * lon.cos(),
            (n + self.height_km) * cos_lat * lon.sin(),
            (n * (1.0 - EARTH_ECCENTRICITY_SQUARED) + self.height_km) * sin_lat,
        ]
    }
}
