use std::time::Duration;

use thiserror::Error;

/// Failure of a single element source. `Clone` because one in-flight
/// resolution hands the same result to every waiting caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementsError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("no two-line element set found")]
    Parse,
    #[error("no element sources configured")]
    NoSources,
}

impl ElementsError {
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ElementsError::Timeout(timeout)
        } else if let Some(status) = err.status() {
            ElementsError::Status(status.as_u16())
        } else {
            ElementsError::Network(err.to_string())
        }
    }
}
