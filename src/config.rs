use std::time::Duration as StdDuration;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::elements::bundled::{self, BundledElementSet, ISS_NORAD_ID};
use crate::elements::ElementSet;
use crate::predict::PassSearch;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub satellite: SatelliteConfig,
    pub elements: ElementsConfig,
    pub predict: PredictConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SatelliteConfig {
    pub norad_id: u32,
    pub name: Option<String>,
    /// Used to unwrap the five-digit revolution counter
    pub launch_date: Option<NaiveDate>,
    /// Fallback TLE text replacing the built-in one
    pub bundled_tle: Option<String>,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            norad_id: ISS_NORAD_ID,
            name: None,
            launch_date: None,
            bundled_tle: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ElementsConfig {
    pub primary_url: String,
    pub secondary_url: Option<String>,
    #[serde(deserialize_with = "de_duration")]
    pub request_timeout: StdDuration,
    #[serde(deserialize_with = "de_duration")]
    pub max_age: StdDuration,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            primary_url: "https://api.wheretheiss.at/v1/satellites/{norad_id}/tles".to_string(),
            secondary_url: Some(
                "https://api.wheretheiss.at/v1/satellites/{norad_id}/tles?format=text".to_string(),
            ),
            request_timeout: StdDuration::from_secs(8),
            max_age: StdDuration::from_secs(6 * 3600),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    #[serde(deserialize_with = "de_duration")]
    pub window: StdDuration,
    #[serde(deserialize_with = "de_duration")]
    pub step: StdDuration,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            window: StdDuration::from_secs(12 * 3600),
            step: StdDuration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub position_url: String,
    #[serde(deserialize_with = "de_duration")]
    pub request_timeout: StdDuration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            position_url: "https://api.wheretheiss.at/v1/satellites/{norad_id}".to_string(),
            request_timeout: StdDuration::from_secs(8),
        }
    }
}

fn de_duration<'de, D>(deserializer: D) -> Result<StdDuration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

pub(crate) fn to_chrono(
    field: &'static str,
    duration: StdDuration,
) -> Result<chrono::Duration, ConfigError> {
    chrono::Duration::from_std(duration).map_err(|e| ConfigError::Invalid {
        field,
        reason: e.to_string(),
    })
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    pub fn pass_search(&self) -> Result<PassSearch, ConfigError> {
        let window = to_chrono("predict.window", self.predict.window)?;
        let step = to_chrono("predict.step", self.predict.step)?;
        PassSearch::new(window, step).map_err(|e| ConfigError::Invalid {
            field: "predict",
            reason: e.to_string(),
        })
    }

    /// Fallback element set for the configured satellite, if there is one.
    pub fn bundled(&self) -> Result<Option<BundledElementSet>, ConfigError> {
        if let Some(text) = &self.satellite.bundled_tle {
            let element_set = ElementSet::from_text(text).map_err(|e| ConfigError::Invalid {
                field: "satellite.bundled_tle",
                reason: e.to_string(),
            })?;
            if element_set.norad_id() != Some(self.satellite.norad_id) {
                return Err(ConfigError::Invalid {
                    field: "satellite.bundled_tle",
                    reason: format!(
                        "catalog number does not match norad_id {}",
                        self.satellite.norad_id
                    ),
                });
            }
            return Ok(Some(BundledElementSet {
                version: "config".to_string(),
                element_set,
            }));
        }

        Ok((self.satellite.norad_id == ISS_NORAD_ID).then(bundled::iss))
    }

    pub fn launch_date(&self) -> Option<NaiveDate> {
        self.satellite.launch_date.or_else(|| {
            if self.satellite.norad_id == ISS_NORAD_ID {
                bundled::iss_launch_date()
            } else {
                None
            }
        })
    }
}
