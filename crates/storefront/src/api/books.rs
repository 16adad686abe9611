//! Catalog reads: paged listing, single lookup, category browse.

use std::time::Duration;

use moka::future::Cache;
use paperback_core::BookId;
use tracing::{instrument, warn};

use crate::config::DataMode;

use super::client::ApiClient;
use super::fixtures;
use super::types::{Book, Paginated, ResultSet};
use super::Sourced;

/// How long cached catalog reads stay fresh.
const CACHE_TTL: Duration = Duration::from_secs(300);
/// Maximum number of cached entries per cache.
const CACHE_CAPACITY: u64 = 1_000;

/// Read access to the book catalog.
///
/// Live-mode reads are cached for five minutes; fixture mode reads the
/// in-memory catalog directly and skips the cache.
#[derive(Clone)]
pub struct CatalogService {
    client: ApiClient,
    mode: DataMode,
    page_cache: Cache<(u32, u32), Paginated<Book>>,
    book_cache: Cache<BookId, Option<Book>>,
}

#[derive(serde::Serialize)]
struct PageQuery {
    page: u32,
    limit: u32,
}

#[derive(serde::Serialize)]
struct CategoryQuery<'a> {
    category: &'a str,
}

impl CatalogService {
    pub(super) fn new(client: ApiClient, mode: DataMode) -> Self {
        Self {
            client,
            mode,
            page_cache: Cache::builder()
                .time_to_live(CACHE_TTL)
                .max_capacity(CACHE_CAPACITY)
                .build(),
            book_cache: Cache::builder()
                .time_to_live(CACHE_TTL)
                .max_capacity(CACHE_CAPACITY)
                .build(),
        }
    }

    /// List a page of the catalog. `page` is 1-indexed.
    ///
    /// Falls back to the same page of the fixture catalog on a live failure.
    #[instrument(skip(self))]
    pub async fn list_books(&self, page: u32, limit: u32) -> Sourced<Paginated<Book>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::page_books(page, limit));
        }

        if let Some(cached) = self.page_cache.get(&(page, limit)).await {
            return Sourced::Live(cached);
        }

        match self
            .client
            .get("/books", Some(&PageQuery { page, limit }))
            .await
        {
            Ok(result) => {
                self.page_cache.insert((page, limit), Paginated::clone(&result)).await;
                Sourced::Live(result)
            }
            Err(cause) => {
                warn!(error = %cause, page, limit, "Catalog listing failed, serving fixture page");
                Sourced::Degraded(fixtures::page_books(page, limit), cause)
            }
        }
    }

    /// Look up one book by id.
    ///
    /// Falls back to the fixture book with the same id (or `None`) on a
    /// live failure.
    #[instrument(skip(self))]
    pub async fn get_book(&self, id: &BookId) -> Sourced<Option<Book>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::book_by_id(id));
        }

        if let Some(cached) = self.book_cache.get(id).await {
            return Sourced::Live(cached);
        }

        match self
            .client
            .get::<Book, ()>(&format!("/books/{}", id.as_str()), None)
            .await
        {
            Ok(book) => {
                let found = Some(book);
                self.book_cache.insert(id.clone(), found.clone()).await;
                Sourced::Live(found)
            }
            Err(cause) => {
                warn!(error = %cause, book_id = %id, "Book lookup failed, serving fixture copy");
                Sourced::Degraded(fixtures::book_by_id(id), cause)
            }
        }
    }

    /// All books in a category (exact match on the category label).
    ///
    /// Falls back to the fixture books in that category on a live failure.
    #[instrument(skip(self))]
    pub async fn books_by_category(&self, category: &str) -> Sourced<ResultSet<Book>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(category_result(fixtures::books_by_category(category)));
        }

        match self
            .client
            .get("/books/category", Some(&CategoryQuery { category }))
            .await
        {
            Ok(result) => Sourced::Live(result),
            Err(cause) => {
                warn!(error = %cause, category, "Category listing failed, serving fixture set");
                Sourced::Degraded(category_result(fixtures::books_by_category(category)), cause)
            }
        }
    }
}

fn category_result(data: Vec<Book>) -> ResultSet<Book> {
    ResultSet {
        total: data.len(),
        data,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::session::{MemoryCredentialStore, SessionEvents};

    fn fixture_catalog() -> CatalogService {
        let config = BackendConfig::fixtures();
        let client =
            ApiClient::new(&config, MemoryCredentialStore::shared(), SessionEvents::new())
                .unwrap();
        CatalogService::new(client, config.mode)
    }

    #[tokio::test]
    async fn test_fixture_listing_paginates() {
        let catalog = fixture_catalog();

        let first = catalog.list_books(1, 5).await;
        assert!(matches!(first, Sourced::Fixture(_)));
        assert_eq!(first.data().data.len(), 5);
        assert!(first.data().has_more);

        let last = catalog.list_books(3, 5).await;
        assert_eq!(last.data().data.len(), 2);
        assert!(!last.data().has_more);
    }

    #[tokio::test]
    async fn test_fixture_lookup() {
        let catalog = fixture_catalog();

        let found = catalog.get_book(&BookId::new("1")).await;
        assert!(found.data().is_some());

        let missing = catalog.get_book(&BookId::new("no-such-book")).await;
        assert!(missing.data().is_none());
        assert!(!missing.is_degraded());
    }

    #[tokio::test]
    async fn test_fixture_category_browse() {
        let catalog = fixture_catalog();
        let result = catalog.books_by_category("Mystery").await;
        assert_eq!(result.data().total, result.data().data.len());
        assert!(result.data().data.iter().all(|b| b.category == "Mystery"));
    }
}
