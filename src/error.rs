//! Error types for the Libris server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure, echoed back to the caller
/// alongside the submitted form values.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    /// Name of the offending field
    pub field: String,
    /// Human-readable message
    pub message: String,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Page {page} is out of range (catalog has {page_count} pages)")]
    PageOutOfRange { page: i64, page_count: i64 },

    #[error("Empty search term")]
    EmptySearch,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message, errors) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NotFound", msg, vec![]),
            AppError::PageOutOfRange { page, page_count } => (
                StatusCode::NOT_FOUND,
                "PageOutOfRange",
                format!(
                    "Page {} is out of range (catalog has {} pages)",
                    page, page_count
                ),
                vec![],
            ),
            // Normally intercepted by the search handler, which redirects
            // to the unfiltered listing instead.
            AppError::EmptySearch => (
                StatusCode::BAD_REQUEST,
                "EmptySearch",
                "Search term is empty".to_string(),
                vec![],
            ),
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation",
                "Validation failed".to_string(),
                errors,
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database",
                    "Database error".to_string(),
                    vec![],
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BadRequest", msg, vec![]),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal",
                    "Internal server error".to_string(),
                    vec![],
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
            errors,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field)),
                })
            })
            .collect();
        AppError::Validation(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1, message = "\"title\" is required"))]
        title: String,
    }

    #[test]
    fn test_validation_errors_to_field_errors() {
        let form = Form {
            title: String::new(),
        };
        let err: AppError = form.validate().unwrap_err().into();
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "title");
                assert_eq!(fields[0].message, "\"title\" is required");
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }
}
