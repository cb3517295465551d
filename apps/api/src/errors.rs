use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::store::StoreError;
use crate::validation::FieldErrors;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed: {}", .0.summary())]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Email error: {0}")]
    Email(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl AppError {
    pub fn not_authenticated() -> Self {
        AppError::Unauthorized("Not authenticated".to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut detail: Option<String> = None;
        let mut field_errors: Option<Value> = None;

        let (status, message) = match &self {
            AppError::Validation(errors) => {
                field_errors = serde_json::to_value(errors).ok();
                (StatusCode::BAD_REQUEST, errors.summary())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Store(StoreError::DuplicateUsername) => (
                StatusCode::BAD_REQUEST,
                "Username is already taken. Please choose a different username.".to_string(),
            ),
            AppError::Store(StoreError::DuplicateEmail) => (
                StatusCode::BAD_REQUEST,
                "Email is already registered. Please use a different email or try signing in."
                    .to_string(),
            ),
            AppError::Store(StoreError::Database(e)) => {
                tracing::error!("Database error: {e}");
                detail = Some(e.to_string());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::Email(msg) => {
                tracing::error!("Email error: {msg}");
                detail = Some(msg.clone());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send email".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                detail = Some(msg.clone());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate suggestions".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                detail = Some(format!("{e:?}"));
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
            AppError::NotImplemented(msg) => (StatusCode::NOT_IMPLEMENTED, msg.clone()),
        };

        let mut body = json!({
            "success": false,
            "message": message,
        });
        if let Some(errors) = field_errors {
            body["errors"] = errors;
        }
        // Debug builds expose the underlying failure to ease local development.
        if cfg!(debug_assertions) {
            if let Some(detail) = detail {
                body["error"] = Value::String(detail);
            }
        }

        (status, Json(body)).into_response()
    }
}
