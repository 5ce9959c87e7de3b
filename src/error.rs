//! Error types for the library API server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing request fields; one message per violated rule.
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    /// Business-rule rejection (duplicate ISBN, book already loaned, ...).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal misuse of a service (e.g. update without an id). This is a
    /// programming error, not user input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Error response body: a flat list of human-readable messages.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { errors })).into_response()
            }
            AppError::BusinessRule(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { errors: vec![msg] }),
            )
                .into_response(),
            // Path-addressed resource absent: status only, no body.
            AppError::NotFound(msg) => {
                tracing::debug!("not found: {}", msg);
                StatusCode::NOT_FOUND.into_response()
            }
            AppError::InvalidArgument(msg) => {
                tracing::error!("invalid argument: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { errors: vec![msg] }),
                )
                    .into_response()
            }
            AppError::Database(e) => {
                tracing::error!("database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        errors: vec!["Erro interno do servidor.".to_string()],
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
