use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::detector::PredictError;

/// Errors surfaced by the prediction endpoint, rendered as `{"error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No text provided.")]
    MissingText,

    #[error("Invalid JSON format. Please send text in the request body.")]
    InvalidJson,

    #[error("Only POST method is allowed for prediction.")]
    MethodNotAllowed,

    #[error("Model not yet initialized or failed to load. Check server logs.")]
    ServiceUnavailable,

    #[error("An internal server error occurred during prediction: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingText | Self::InvalidJson => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::ServiceUnavailable | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::ServiceUnavailable => Self::ServiceUnavailable,
            other => {
                error!("Prediction Error: {}", other);
                Self::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
