//! Books repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, BookForm},
};

use super::BookStore;

const BOOK_COLUMNS: &str = "id, title, author, genre, year, created_at, updated_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY title ASC LIMIT $1 OFFSET $2",
            BOOK_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn search(&self, term: &str) -> AppResult<Vec<Book>> {
        // Substring match on the text fields; year only matches the term
        // as a whole ("200" must not match 2008).
        let pattern = format!("%{}%", term);

        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {}
            FROM books
            WHERE title ILIKE $1
               OR author ILIKE $1
               OR genre ILIKE $1
               OR year::text = $2
            "#,
            BOOK_COLUMNS
        ))
        .bind(&pattern)
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn create(&self, form: &BookForm) -> AppResult<Book> {
        let now = Utc::now();

        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, genre, year, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&form.title)
        .bind(&form.author)
        .bind(&form.genre)
        .bind(form.year)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    async fn update(&self, id: i32, form: &BookForm) -> AppResult<Option<Book>> {
        let now = Utc::now();

        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET title = $1, author = $2, genre = $3, year = $4, updated_at = $5
            WHERE id = $6
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&form.title)
        .bind(&form.author)
        .bind(&form.genre)
        .bind(form.year)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
