use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::validation::FieldErrors;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(FieldErrors),

    #[error("database error: {0}")]
    Database(anyhow::Error),

    #[error("login required")]
    AuthRequired,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("no booking found")]
    NoPendingConfirmation,

    #[error("{0}")]
    Conflict(String),

    #[error("unauthorized")]
    Unauthorized,
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Database(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({ "error": "validation failed", "fields": fields }),
            ),
            AppError::Database(cause) => {
                tracing::error!(error = %cause, "persistence failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "something went wrong, please try again later" }),
                )
            }
            AppError::AuthRequired => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": "login required", "redirect": "/login" }),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": "invalid email or password" }),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": format!("not found: {what}") }),
            ),
            AppError::NoPendingConfirmation => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": "no booking found", "redirect": "/booking" }),
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                serde_json::json!({ "error": msg }),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "error": "unauthorized" }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
