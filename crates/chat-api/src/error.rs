use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use chat_core::DomainError;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::Validation(msg) => {
                tracing::warn!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApiError::Domain(DomainError::InvalidArgument(msg)) => {
                tracing::warn!("Invalid argument: {}", msg);
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApiError::Domain(e @ DomainError::StorageError { .. }) => {
                tracing::error!("Storage error: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_ERROR")
            }
            ApiError::Domain(DomainError::SubscriptionError(msg)) => {
                tracing::error!("Subscription error: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "SUBSCRIPTION_ERROR")
            }
        };

        let body = Json(ApiResponse::<()>::error(code, &self.to_string()));
        (status, body).into_response()
    }
}
