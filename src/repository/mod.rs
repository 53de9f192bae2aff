//! Repository layer for database operations

pub mod books;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, BookForm},
};

/// Persistence operations over the book catalog.
///
/// The service layer only talks to this trait; the sqlx-backed
/// implementation lives in [`books::BooksRepository`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Database connectivity check
    async fn ping(&self) -> AppResult<()>;

    /// Total number of books in the catalog
    async fn count(&self) -> AppResult<i64>;

    /// Fetch the title-ascending slice at `[offset, offset + limit)`
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Book>>;

    /// Case-insensitive substring match on title/author/genre, exact
    /// textual match on year
    async fn search(&self, term: &str) -> AppResult<Vec<Book>>;

    async fn get(&self, id: i32) -> AppResult<Option<Book>>;

    async fn create(&self, form: &BookForm) -> AppResult<Book>;

    /// Update an existing book; `Ok(None)` when the id does not exist
    async fn update(&self, id: i32, form: &BookForm) -> AppResult<Option<Book>>;

    /// Delete a book; `Ok(false)` when the id does not exist
    async fn delete(&self, id: i32) -> AppResult<bool>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            pool,
        }
    }
}
