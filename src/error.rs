//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::logic::connection::ConnectionError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Startup errors
    #[error("invalid configuration: {0}")]
    Config(String),

    // Event source errors
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    // External resource errors
    #[error("basemap unavailable: {0}")]
    Basemap(String),

    // Validation errors
    #[error("validation error: {0}")]
    Validation(String),

    // Generic errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Basemap(msg) => {
                tracing::warn!("Basemap error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Basemap unavailable".to_string())
            }
            AppError::Connection(err) => {
                tracing::warn!("Connection error: {}", err);
                (StatusCode::BAD_GATEWAY, "Event source unavailable".to_string())
            }
            AppError::Config(msg) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Basemap(err.to_string())
    }
}
