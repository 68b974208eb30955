use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Error response body shared by every failed request
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub name: String,
    pub message: String,
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
/// Domain errors are raised where they are detected and mapped to a status
/// code and JSON body here, in one place. Client errors (4xx) are not logged
/// at error level; server errors (5xx) are logged with full detail while the
/// client sees a generic body.
#[derive(Debug)]
pub enum ApiError {
    /// No key value pair exists with the requested key
    NotFound(String),
    /// A key value pair with this key already exists
    AlreadyExists(String),
    /// Database operation error
    Database(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(key) => {
                let message = format!("Key value pair with key='{}' does not exist.", key);
                tracing::debug!("{}", message);
                (StatusCode::NOT_FOUND, message)
            }
            ApiError::AlreadyExists(key) => {
                let message = format!("Key value pair with key='{}' already exists.", key);
                tracing::debug!("{}", message);
                (StatusCode::CONFLICT, message)
            }
            ApiError::Database(error) => {
                tracing::error!("Database error: {:#}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };

        let body = Json(ErrorBody {
            name: "HttpError".to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::DuplicateKey(key) => ApiError::AlreadyExists(key),
            StoreError::Backend(error) => ApiError::Database(error),
        }
    }
}
