//! Book listing, search and CRUD service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::SearchResults,
        Book, BookForm, BookPage,
    },
    repository::BookStore,
};

/// Number of books per listing page
pub const PAGE_SIZE: i64 = 8;

#[derive(Clone)]
pub struct BooksService {
    store: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// Fetch one page of the title-sorted listing.
    ///
    /// `page` defaults to 1 when absent or below 1. A page beyond the last
    /// one is an error, never an empty success.
    pub async fn list_page(&self, page: Option<i64>) -> AppResult<BookPage> {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);

        let total_count = self.store.count().await?;
        let page_count = (total_count + PAGE_SIZE - 1) / PAGE_SIZE;

        if page > page_count {
            return Err(AppError::PageOutOfRange { page, page_count });
        }

        // page is bounded by page_count here, so this cannot overflow
        let offset = PAGE_SIZE * (page - 1);

        let books = self.store.list(PAGE_SIZE, offset).await?;

        Ok(BookPage {
            books,
            total_count,
            page_count,
            page,
        })
    }

    /// Search title, author and genre (case-insensitive substring) and
    /// year (exact). An empty term never reaches the store; the caller
    /// redirects to the unfiltered listing instead.
    pub async fn search(&self, term: &str) -> AppResult<SearchResults> {
        if term.is_empty() {
            return Err(AppError::EmptySearch);
        }

        let books = self.store.search(term).await?;
        let total_results = books.len() as i64;

        Ok(SearchResults {
            books,
            total_results,
        })
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn create_book(&self, form: &BookForm) -> AppResult<Book> {
        form.validate()?;
        self.store.create(form).await
    }

    pub async fn update_book(&self, id: i32, form: &BookForm) -> AppResult<Book> {
        form.validate()?;
        self.store
            .update(id, form)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Store connectivity check backing the readiness endpoint
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockBookStore;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn book(id: i32, title: &str) -> Book {
        let now = Utc::now();
        Book {
            id,
            title: title.to_string(),
            author: "Author".to_string(),
            genre: None,
            year: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn books(n: usize) -> Vec<Book> {
        (0..n).map(|i| book(i as i32, &format!("Book {}", i))).collect()
    }

    #[tokio::test]
    async fn test_first_page_of_seventeen_books() {
        let mut store = MockBookStore::new();
        store.expect_count().returning(|| Ok(17));
        store
            .expect_list()
            .with(eq(8), eq(0))
            .returning(|_, _| Ok(books(8)));

        let service = BooksService::new(Arc::new(store));
        let page = service.list_page(Some(1)).await.unwrap();

        assert_eq!(page.books.len(), 8);
        assert_eq!(page.total_count, 17);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_last_page_holds_the_remainder() {
        let mut store = MockBookStore::new();
        store.expect_count().returning(|| Ok(17));
        store
            .expect_list()
            .with(eq(8), eq(16))
            .returning(|_, _| Ok(books(1)));

        let service = BooksService::new(Arc::new(store));
        let page = service.list_page(Some(3)).await.unwrap();

        assert_eq!(page.books.len(), 1);
        assert_eq!(page.page_count, 3);
    }

    #[tokio::test]
    async fn test_page_beyond_last_is_out_of_range() {
        let mut store = MockBookStore::new();
        store.expect_count().returning(|| Ok(17));
        // No expect_list: fetching the slice for a bad page would panic.

        let service = BooksService::new(Arc::new(store));
        let err = service.list_page(Some(4)).await.unwrap_err();

        match err {
            AppError::PageOutOfRange { page, page_count } => {
                assert_eq!(page, 4);
                assert_eq!(page_count, 3);
            }
            other => panic!("expected PageOutOfRange, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_huge_page_number_is_out_of_range_without_overflow() {
        let mut store = MockBookStore::new();
        store.expect_count().returning(|| Ok(17));

        let service = BooksService::new(Arc::new(store));
        let err = service.list_page(Some(i64::MAX)).await.unwrap_err();

        assert!(matches!(err, AppError::PageOutOfRange { .. }));
    }

    #[tokio::test]
    async fn test_missing_or_invalid_page_defaults_to_one() {
        for requested in [None, Some(0), Some(-3)] {
            let mut store = MockBookStore::new();
            store.expect_count().returning(|| Ok(10));
            store
                .expect_list()
                .with(eq(8), eq(0))
                .returning(|_, _| Ok(books(8)));

            let service = BooksService::new(Arc::new(store));
            let page = service.list_page(requested).await.unwrap();
            assert_eq!(page.page, 1);
        }
    }

    #[tokio::test]
    async fn test_page_count_is_ceiling_of_count_over_page_size() {
        for (total, expected_pages) in [(0, 0), (1, 1), (8, 1), (9, 2), (16, 2), (17, 3)] {
            let mut store = MockBookStore::new();
            store.expect_count().returning(move || Ok(total));
            store.expect_list().returning(|_, _| Ok(vec![]));

            let service = BooksService::new(Arc::new(store));
            match service.list_page(Some(1)).await {
                Ok(page) => assert_eq!(page.page_count, expected_pages),
                Err(AppError::PageOutOfRange { page_count, .. }) => {
                    // Empty catalog: page 1 of 0 pages
                    assert_eq!(total, 0);
                    assert_eq!(page_count, expected_pages);
                }
                Err(other) => panic!("unexpected error {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_empty_search_never_queries_the_store() {
        // An unexpected store call would panic the mock.
        let store = MockBookStore::new();

        let service = BooksService::new(Arc::new(store));
        let err = service.search("").await.unwrap_err();

        assert!(matches!(err, AppError::EmptySearch));
    }

    #[tokio::test]
    async fn test_search_returns_matches_with_count() {
        let mut store = MockBookStore::new();
        store
            .expect_search()
            .with(eq("dune"))
            .returning(|_| Ok(vec![book(1, "Dune")]));

        let service = BooksService::new(Arc::new(store));
        let results = service.search("dune").await.unwrap();

        assert_eq!(results.total_results, 1);
        assert_eq!(results.books[0].title, "Dune");
    }

    #[tokio::test]
    async fn test_create_with_empty_title_is_rejected_before_the_store() {
        let store = MockBookStore::new();

        let service = BooksService::new(Arc::new(store));
        let form = BookForm {
            title: String::new(),
            author: "Frank Herbert".to_string(),
            genre: None,
            year: Some(1965),
        };
        let err = service.create_book(&form).await.unwrap_err();

        match err {
            AppError::Validation(fields) => {
                assert!(fields.iter().any(|f| f.field == "title"));
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_missing_book_is_not_found() {
        let mut store = MockBookStore::new();
        store.expect_update().returning(|_, _| Ok(None));

        let service = BooksService::new(Arc::new(store));
        let form = BookForm {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: None,
            year: None,
        };
        let err = service.update_book(42, &form).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ping_surfaces_store_failure() {
        let mut store = MockBookStore::new();
        store
            .expect_ping()
            .returning(|| Err(AppError::Database(sqlx::Error::PoolClosed)));

        let service = BooksService::new(Arc::new(store));
        let err = service.ping().await.unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_book_is_not_found() {
        let mut store = MockBookStore::new();
        store.expect_delete().with(eq(99)).returning(|_| Ok(false));

        let service = BooksService::new(Arc::new(store));
        let err = service.delete_book(99).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
