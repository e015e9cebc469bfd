use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rooms_core::CoreError;
use serde_json::json;

/// Handler failures. The detail is logged; callers only see a generic message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("database error: {0}")]
    DatabaseError(String),
    #[error("ingestion error: {0}")]
    IngestionError(String),
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::StorageError(msg) => AppError::DatabaseError(msg),
            CoreError::IngestionError(msg) => AppError::IngestionError(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            AppError::IngestionError(msg) => {
                tracing::error!("Refresh failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Refresh failed")
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
