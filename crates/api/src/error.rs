use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use storage::StorageError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Forecast store unavailable: {0}")]
    Store(#[from] StorageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");

        let (status, message) = match self {
            ApiError::Store(StorageError::RetriesExhausted { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Forecast store could not be reached",
            ),
            ApiError::Store(StorageError::Database(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Forecast store error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
