//! Error handling module for the Wellmind backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and
//! JSON error bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input, with optional field-level detail
    Validation {
        message: String,
        field: Option<String>,
    },
    /// Resource not found
    NotFound(String),
    /// Constraint violation (duplicate username)
    Conflict(String),
    /// Store unreachable or query failure; detail is logged, not exposed
    Storage(String),
    /// Backend process unreachable from the gateway
    Upstream(String),
}

impl AppError {
    /// Shorthand for a validation error without field detail.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Shorthand for a validation error pinned to a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get the message exposed to the client.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation { message, .. } => message.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            // Storage detail stays in the logs
            AppError::Storage(_) => "Internal server error".to_string(),
            AppError::Upstream(_) => "Backend unavailable".to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Validation { message, field } => match field {
                Some(field) => write!(f, "validation error on {}: {}", field, message),
                None => write!(f, "validation error: {}", message),
            },
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "conflict: {}", msg),
            AppError::Storage(msg) => write!(f, "storage error: {}", msg),
            AppError::Upstream(msg) => write!(f, "upstream error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return AppError::Conflict("Resource already exists".to_string());
            }
        }
        tracing::error!("Database error: {:?}", err);
        AppError::Storage(format!("Database error: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Upstream request error: {:?}", err);
        AppError::Upstream(format!("Upstream request error: {}", err))
    }
}

/// JSON error body: `{"message": ..., "field"?: ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorBody {
    pub fn new(error: &AppError) -> Self {
        let field = match error {
            AppError::Validation { field, .. } => field.clone(),
            _ => None,
        };
        Self {
            message: error.message(),
            field,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody::new(&self);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Storage("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Upstream("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_storage_detail_not_exposed() {
        let err = AppError::Storage("connection refused at 127.0.0.1".into());
        assert_eq!(err.message(), "Internal server error");
    }

    #[test]
    fn test_validation_field_in_body() {
        let err = AppError::invalid_field("title", "Title is required");
        let body = ErrorBody::new(&err);
        assert_eq!(body.field.as_deref(), Some("title"));
        assert_eq!(body.message, "Title is required");
    }
}
