//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::DatasetError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    // Resource errors
    #[error("not found: {0}")]
    NotFound(String),

    // Validation errors
    #[error("validation failed: {0}")]
    ValidationError(String),

    // Data errors
    #[error("dataset error: {0}")]
    DatasetError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::DatasetError(msg) => {
                tracing::error!("Dataset error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Dataset error occurred")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<DatasetError> for AppError {
    fn from(err: DatasetError) -> Self {
        AppError::DatasetError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let response = AppError::ValidationError("age is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::NotFound("no such page".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::from(DatasetError::MissingColumn("Fever".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
