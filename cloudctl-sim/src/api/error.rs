//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::service::ServiceError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => {
                tracing::debug!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::RegionNotFound(name) => {
                ApiError::NotFound(format!("Region {} not found", name))
            }
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::InvalidState(msg) => ApiError::BadRequest(msg),
            ServiceError::ValidationError(msg) => ApiError::BadRequest(msg),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
