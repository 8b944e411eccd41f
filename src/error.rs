use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Maps each failure to an HTTP status code and formats it as a JSON
/// response. Absent and conflicting keys are expected outcomes; only
/// `StoreError` represents an unexpected storage failure.
#[derive(Debug)]
pub enum ApiError {
    /// Request carried an empty key
    EmptyKey,
    /// No record exists for the key
    KeyNotFound(String),
    /// A record already exists for the key
    KeyExists(String),
    /// Storage operation error
    StoreError(anyhow::Error),
}

impl ApiError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ApiError::EmptyKey => (
                StatusCode::BAD_REQUEST,
                "Key must be a non-empty string".to_string(),
            ),
            ApiError::KeyNotFound(key) => {
                (StatusCode::NOT_FOUND, format!("Key '{}' not found", key))
            }
            ApiError::KeyExists(key) => (
                StatusCode::CONFLICT,
                format!("Key '{}' already exists", key),
            ),
            ApiError::StoreError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", err),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::StoreError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_maps_to_bad_request() {
        let (status, message) = ApiError::EmptyKey.status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("non-empty"));
    }

    #[test]
    fn missing_key_maps_to_not_found() {
        let (status, message) = ApiError::KeyNotFound("alpha".to_string()).status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(message.contains("alpha"));
        assert!(message.contains("not found"));
    }

    #[test]
    fn duplicate_key_maps_to_conflict() {
        let (status, message) = ApiError::KeyExists("beta".to_string()).status_and_message();
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(message.contains("beta"));
        assert!(message.contains("already exists"));
    }

    #[test]
    fn store_error_maps_to_internal_error() {
        let err = anyhow::anyhow!("connection reset");
        let (status, message) = ApiError::StoreError(err).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.contains("connection reset"));
    }
}
