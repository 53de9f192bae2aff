//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, FieldError},
    models::{
        book::{ListQuery, SearchQuery, SearchResults},
        Book, BookForm, BookPage,
    },
};

/// Path of the paginated listing, used as redirect target
const BOOKS_PATH: &str = "/api/v1/books";

/// A creation/update form together with its validation errors.
///
/// Returned with the submitted values echoed back when validation fails,
/// and with a blank book for the empty form scaffold.
#[derive(Serialize, ToSchema)]
pub struct BookFormView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub book: BookForm,
    pub errors: Vec<FieldError>,
}

/// The catalog listing is the landing page
pub async fn index_redirect() -> Redirect {
    Redirect::to(BOOKS_PATH)
}

/// List one page of the catalog, ordered by title
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of books", body = BookPage),
        (status = 404, description = "Page out of range")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<BookPage>> {
    let page = state.services.books.list_page(query.page).await?;
    Ok(Json(page))
}

/// Search the catalog
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching books", body = SearchResults),
        (status = 303, description = "Empty term, redirected to the listing")
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let term = query.search.unwrap_or_default();

    match state.services.books.search(&term).await {
        Ok(results) => Ok(Json(results).into_response()),
        // No term: send the caller to the unfiltered listing rather than
        // serving an empty result page.
        Err(AppError::EmptySearch) => Ok(Redirect::to(BOOKS_PATH).into_response()),
        Err(e) => Err(e),
    }
}

/// Blank creation form
#[utoipa::path(
    get,
    path = "/books/new",
    tag = "books",
    responses(
        (status = 200, description = "Empty book form", body = BookFormView)
    )
)]
pub async fn new_book_form() -> Json<BookFormView> {
    Json(BookFormView {
        id: None,
        book: BookForm::default(),
        errors: vec![],
    })
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books/new",
    tag = "books",
    request_body = BookForm,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 422, description = "Invalid form, values echoed back", body = BookFormView)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(form): Json<BookForm>,
) -> AppResult<Response> {
    match state.services.books.create_book(&form).await {
        Ok(book) => Ok((StatusCode::CREATED, Json(book)).into_response()),
        Err(AppError::Validation(errors)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(BookFormView {
                id: None,
                book: form,
                errors,
            }),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

/// Get a single book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_book(id).await?;
    Ok(Json(book))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookForm,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Invalid form, values echoed back", body = BookFormView)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(form): Json<BookForm>,
) -> AppResult<Response> {
    match state.services.books.update_book(id, &form).await {
        Ok(book) => Ok(Json(book).into_response()),
        Err(AppError::Validation(errors)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(BookFormView {
                id: Some(id),
                book: form,
                errors,
            }),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

/// Delete a book and return to the listing
#[utoipa::path(
    delete,
    path = "/books/{id}/delete",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 303, description = "Book deleted, redirected to the listing"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    state.services.books.delete_book(id).await?;
    Ok(Redirect::to(BOOKS_PATH))
}
