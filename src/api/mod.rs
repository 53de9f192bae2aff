//! API handlers for the Libris REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::http::Uri;

use crate::error::AppError;

/// Fallback for requests matching no route
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!(
        "Sorry! We couldn't find the page you were looking for at '{}'",
        uri
    ))
}
