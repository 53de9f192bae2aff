//! Book record and related request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A catalog entry as stored in the `books` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    /// Store-generated identifier
    pub id: i32,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    /// Publication year
    pub year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form payload for creating or updating a book.
///
/// Title and author are required non-empty; genre and year are optional.
/// On validation failure the submitted values are echoed back unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookForm {
    #[validate(length(min = 1, message = "\"title\" is required"))]
    #[serde(default)]
    pub title: String,
    #[validate(length(min = 1, message = "\"author\" is required"))]
    #[serde(default)]
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

/// One page of the title-sorted book listing, with pagination metadata
#[derive(Debug, Serialize, ToSchema)]
pub struct BookPage {
    /// Page-sized slice of books, ordered by title ascending
    pub books: Vec<Book>,
    /// Total number of books in the catalog
    pub total_count: i64,
    /// Total number of pages
    pub page_count: i64,
    /// The requested page number
    pub page: i64,
}

/// Search results over the whole catalog (no pagination)
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResults {
    pub books: Vec<Book>,
    /// Number of matching books
    pub total_results: i64,
}

/// Query parameters for the paginated listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Page number (defaults to 1 when absent or not a number)
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: Option<i64>,
}

/// Treat a non-numeric `page` value the same as an absent one
fn lenient_page<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// Query parameters for the search endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Term matched against title, author, genre (substring) and year (exact)
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_with_title_and_author_is_valid() {
        let form = BookForm {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: Some("Science Fiction".to_string()),
            year: Some(1965),
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_empty_title_and_author_are_rejected() {
        let form = BookForm::default();
        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("author"));
    }

    #[test]
    fn test_page_param_tolerates_junk() {
        let q: ListQuery = serde_json::from_str(r#"{"page":"3"}"#).unwrap();
        assert_eq!(q.page, Some(3));

        let q: ListQuery = serde_json::from_str(r#"{"page":"abc"}"#).unwrap();
        assert_eq!(q.page, None);

        let q: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, None);
    }

    #[test]
    fn test_genre_and_year_are_optional() {
        let form = BookForm {
            title: "Emma".to_string(),
            author: "Jane Austen".to_string(),
            genre: None,
            year: None,
        };
        assert!(form.validate().is_ok());
    }
}
