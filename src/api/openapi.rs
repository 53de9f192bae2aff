//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library Catalog REST API",
        license(name = "MIT")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::search_books,
        books::new_book_form,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::BookForm,
            crate::models::book::BookPage,
            crate::models::book::SearchResults,
            books::BookFormView,
            health::HealthResponse,
            crate::error::ErrorResponse,
            crate::error::FieldError,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
