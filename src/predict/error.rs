use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid observer location: {0}")]
    InvalidObserver(String),
    #[error("invalid pass search: {0}")]
    InvalidSearch(String),
    #[error("invalid element set: {0}")]
    InvalidElements(String),
    #[error("propagation error: {0}")]
    Propagation(String),
    #[error("no pass found within {window_hours} hours of {start}, try again shortly")]
    NoPass {
        start: DateTime<Utc>,
        window_hours: i64,
    },
}
