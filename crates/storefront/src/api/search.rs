//! Catalog search: text match, conjunctive filters, and a final sort pass.
//!
//! Filtering and sorting are pure functions over book lists so that
//! fixture mode, live-failure fallback, and the tests all share one
//! implementation.

use std::cmp::Ordering;

use tracing::{instrument, warn};

use crate::config::DataMode;

use super::client::ApiClient;
use super::fixtures;
use super::types::{Book, ResultSet, SearchFilters, SortKey};
use super::Sourced;

/// Full-text search over the catalog.
#[derive(Clone)]
pub struct SearchService {
    client: ApiClient,
    mode: DataMode,
}

impl SearchService {
    pub(super) fn new(client: ApiClient, mode: DataMode) -> Self {
        Self { client, mode }
    }

    /// Search the catalog by free text, then filter and sort.
    ///
    /// Filters are conjunctive and independent; the sort is always applied
    /// last. Falls back to searching the fixture catalog on a live failure,
    /// with the same filters and sort applied.
    #[instrument(skip(self, filters))]
    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Sourced<ResultSet<Book>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(search_fixtures(query, filters));
        }

        match self
            .client
            .get("/search", Some(&query_pairs(query, filters)))
            .await
        {
            Ok(result) => Sourced::Live(result),
            Err(cause) => {
                warn!(error = %cause, query, "Search failed, searching fixture catalog");
                Sourced::Degraded(search_fixtures(query, filters), cause)
            }
        }
    }
}

fn search_fixtures(query: &str, filters: &SearchFilters) -> ResultSet<Book> {
    let mut matches = apply_filters(fixtures::search_books(query), filters);
    sort_books(&mut matches, filters.sort_by.unwrap_or_default());
    ResultSet {
        total: matches.len(),
        data: matches,
    }
}

/// Flatten the query text and set filters into URL query pairs.
fn query_pairs(query: &str, filters: &SearchFilters) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("q", query.to_owned())];
    if let Some(category) = &filters.category {
        pairs.push(("category", category.clone()));
    }
    if let Some(min) = filters.min_price {
        pairs.push(("minPrice", min.amount().to_string()));
    }
    if let Some(max) = filters.max_price {
        pairs.push(("maxPrice", max.amount().to_string()));
    }
    if let Some(rating) = filters.rating {
        pairs.push(("rating", rating.to_string()));
    }
    if let Some(in_stock) = filters.in_stock_only {
        pairs.push(("inStockOnly", in_stock.to_string()));
    }
    if let Some(sort) = filters.sort_by {
        let label = match sort {
            SortKey::Relevance => "relevance",
            SortKey::Price => "price",
            SortKey::Rating => "rating",
            SortKey::Newest => "newest",
        };
        pairs.push(("sortBy", label.to_owned()));
    }
    pairs
}

/// Apply every set filter. Filters are conjunctive: a book survives only
/// if it passes all of them, so the order they are checked in does not
/// affect the result.
pub(crate) fn apply_filters(books: Vec<Book>, filters: &SearchFilters) -> Vec<Book> {
    books
        .into_iter()
        .filter(|book| {
            filters
                .category
                .as_ref()
                .is_none_or(|c| &book.category == c)
                && filters.min_price.is_none_or(|min| book.price >= min)
                && filters.max_price.is_none_or(|max| book.price <= max)
                && filters.rating.is_none_or(|min| book.rating >= min)
                && filters
                    .in_stock_only
                    .is_none_or(|only| !only || book.in_stock)
        })
        .collect()
}

/// Sort in place by the given key. Relevance keeps the match order.
///
/// The sort is stable, so ties keep their relative match order.
pub(crate) fn sort_books(books: &mut [Book], key: SortKey) {
    match key {
        SortKey::Relevance => {}
        SortKey::Price => books.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::Rating => books.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Newest => books.sort_by(|a, b| match (a.published_date, b.published_date) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use paperback_core::{BookId, Price};
    use std::collections::HashSet;

    fn sample(id: &str, title: &str, cents: i64, rating: f32, in_stock: bool) -> Book {
        Book {
            id: BookId::new(id),
            title: title.to_string(),
            author: "Author".to_string(),
            description: String::new(),
            price: Price::from_cents(cents),
            category: "Fiction".to_string(),
            cover_image: String::new(),
            rating,
            review_count: 0,
            in_stock,
            stock_count: u32::from(in_stock),
            isbn: None,
            publisher: None,
            published_date: None,
            tags: None,
        }
    }

    fn ids(books: &[Book]) -> HashSet<String> {
        books.iter().map(|b| b.id.as_str().to_owned()).collect()
    }

    fn matches<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
        let needle = query.to_lowercase();
        books
            .iter()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .collect()
    }

    #[test]
    fn test_title_match_keeps_only_matching_books() {
        // Two books, one with "Sample Book" in the title.
        let books = vec![
            sample("1", "Sample Book", 1000, 4.0, true),
            sample("2", "Another Title", 1200, 3.0, true),
        ];

        let matched = matches(&books, "sample");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched.first().unwrap().id, BookId::new("1"));

        // "dummy" appears in neither title, so the pair yields nothing.
        assert!(matches(&books, "dummy").is_empty());
    }

    #[test]
    fn test_filters_produce_subset() {
        let all = fixtures::search_books("");
        let filtered = apply_filters(
            all.clone(),
            &SearchFilters {
                category: Some("Fiction".to_string()),
                min_price: Some(Price::from_cents(1000)),
                in_stock_only: Some(true),
                ..SearchFilters::default()
            },
        );
        assert!(ids(&filtered).is_subset(&ids(&all)));
        assert!(filtered.len() < all.len());
        for book in &filtered {
            assert_eq!(book.category, "Fiction");
            assert!(book.price >= Price::from_cents(1000));
            assert!(book.in_stock);
        }
    }

    #[test]
    fn test_filters_are_idempotent() {
        let filters = SearchFilters {
            rating: Some(4.0),
            max_price: Some(Price::from_cents(2000)),
            ..SearchFilters::default()
        };
        let once = apply_filters(fixtures::search_books(""), &filters);
        let twice = apply_filters(once.clone(), &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_order_does_not_matter() {
        // Apply the same two filters in either order; the sets agree.
        let all = fixtures::search_books("");
        let category_only = SearchFilters {
            category: Some("Non-Fiction".to_string()),
            ..SearchFilters::default()
        };
        let stock_only = SearchFilters {
            in_stock_only: Some(true),
            ..SearchFilters::default()
        };

        let a = apply_filters(apply_filters(all.clone(), &category_only), &stock_only);
        let b = apply_filters(apply_filters(all, &stock_only), &category_only);
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_in_stock_false_filters_nothing() {
        let all = fixtures::search_books("");
        let kept = apply_filters(
            all.clone(),
            &SearchFilters {
                in_stock_only: Some(false),
                ..SearchFilters::default()
            },
        );
        assert_eq!(kept.len(), all.len());
    }

    #[test]
    fn test_sort_by_price_ascending() {
        let mut books = fixtures::search_books("");
        sort_books(&mut books, SortKey::Price);
        for pair in books.windows(2) {
            assert!(pair[0].price <= pair[1].price);
        }
    }

    #[test]
    fn test_sort_by_rating_descending() {
        let mut books = fixtures::search_books("");
        sort_books(&mut books, SortKey::Rating);
        for pair in books.windows(2) {
            assert!(pair[0].rating >= pair[1].rating);
        }
    }

    #[test]
    fn test_sort_newest_puts_missing_dates_last() {
        let mut books = fixtures::search_books("");
        sort_books(&mut books, SortKey::Newest);

        let first_missing = books
            .iter()
            .position(|b| b.published_date.is_none())
            .unwrap();
        // Everything after the first missing date is also missing a date.
        assert!(books[first_missing..]
            .iter()
            .all(|b| b.published_date.is_none()));
        // Dated books are in descending order.
        let dated: Vec<_> = books.iter().filter_map(|b| b.published_date).collect();
        for pair in dated.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_sort_relevance_keeps_order() {
        let mut books = vec![
            sample("z", "Z", 3000, 1.0, true),
            sample("a", "A", 1000, 5.0, true),
        ];
        sort_books(&mut books, SortKey::Relevance);
        assert_eq!(books.first().unwrap().id, BookId::new("z"));
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let date = Some(Utc::now() - Duration::days(10));
        let mut first = sample("first", "First", 1500, 4.0, true);
        first.published_date = date;
        let mut second = sample("second", "Second", 1500, 4.0, true);
        second.published_date = date;

        for key in [SortKey::Price, SortKey::Rating, SortKey::Newest] {
            let mut books = vec![first.clone(), second.clone()];
            sort_books(&mut books, key);
            assert_eq!(books.first().unwrap().id, BookId::new("first"), "{key:?}");
        }
    }

    #[test]
    fn test_query_pairs_skip_unset_filters() {
        let pairs = query_pairs("dune", &SearchFilters::default());
        assert_eq!(pairs, vec![("q", "dune".to_string())]);

        let pairs = query_pairs(
            "",
            &SearchFilters {
                min_price: Some(Price::from_cents(500)),
                sort_by: Some(SortKey::Newest),
                ..SearchFilters::default()
            },
        );
        assert!(pairs.contains(&("minPrice", "5.00".to_string())));
        assert!(pairs.contains(&("sortBy", "newest".to_string())));
    }

    #[tokio::test]
    async fn test_fixture_mode_search_end_to_end() {
        use crate::config::BackendConfig;
        use crate::session::{MemoryCredentialStore, SessionEvents};

        let config = BackendConfig::fixtures();
        let client =
            ApiClient::new(&config, MemoryCredentialStore::shared(), SessionEvents::new())
                .unwrap();
        let search = SearchService::new(client, config.mode);

        let result = search
            .search(
                "the",
                &SearchFilters {
                    sort_by: Some(SortKey::Price),
                    ..SearchFilters::default()
                },
            )
            .await;

        assert!(matches!(result, Sourced::Fixture(_)));
        let set = result.data();
        assert_eq!(set.total, set.data.len());
        assert!(!set.data.is_empty());
        for pair in set.data.windows(2) {
            assert!(pair[0].price <= pair[1].price);
        }
    }
}
