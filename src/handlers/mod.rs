//! HTTP handlers

pub mod health;
pub mod form;

use crate::AppError;

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
