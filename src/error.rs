use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    FieldErrors(BTreeMap<&'static str, &'static str>),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    Database(anyhow::Error),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::FieldErrors(fields) => write!(f, "Validation failed on {} field(s)", fields.len()),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Database(err) => write!(f, "Database error: {}", err),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({"error": msg, "status": 400}),
            ),
            AppError::FieldErrors(fields) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "validation failed", "fields": fields, "status": 400}),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({"error": msg, "status": 404})),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({"error": msg, "status": 409})),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                json!({"error": msg, "status": 401}),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({"error": msg, "status": 403})),
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error", "status": 500}),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Internal server error", "status": 500}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Database(err)
    }
}

// Uniqueness races are arbitrated by SQLite constraints; surface them as save
// conflicts rather than opaque server errors.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Conflict(format!("unique constraint violated: {}", db_err.message()));
            }
        }
        AppError::Database(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
