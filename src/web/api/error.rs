use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::PredictError;
use crate::service::ServiceError;
use crate::telemetry::TelemetryError;

pub enum ApiError {
    Validation(String),
    NoPass(String),
    Prediction(String),
    Unavailable(String),
    Upstream(String),
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            ServiceError::Predict(PredictError::InvalidObserver(_))
            | ServiceError::Predict(PredictError::InvalidSearch(_)) => {
                ApiError::Validation(message)
            }
            ServiceError::Predict(PredictError::NoPass { .. }) => ApiError::NoPass(message),
            ServiceError::Predict(_) => ApiError::Prediction(message),
            ServiceError::Elements(_) => ApiError::Unavailable(message),
            ServiceError::Config(_) => ApiError::Internal(message),
        }
    }
}

impl From<TelemetryError> for ApiError {
    fn from(e: TelemetryError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::Validation(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_failed", msg),
            ApiError::NoPass(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "no_pass", msg),
            ApiError::Prediction(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "prediction_failed", msg)
            }
            ApiError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "orbital_data_unavailable",
                msg,
            ),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_unavailable", msg),
            ApiError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        (status, Json(ErrorResponse::with_message(error, &message))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
