//! Personalized and per-book recommendations.

use paperback_core::{BookId, UserId};
use tracing::{instrument, warn};

use crate::config::DataMode;

use super::client::ApiClient;
use super::fixtures;
use super::types::Book;
use super::Sourced;

/// Number of books in a fixture or fallback recommendation list.
const FALLBACK_COUNT: usize = 4;

#[derive(Clone)]
pub struct RecommendationService {
    client: ApiClient,
    mode: DataMode,
}

impl RecommendationService {
    pub(super) fn new(client: ApiClient, mode: DataMode) -> Self {
        Self { client, mode }
    }

    /// Recommendations for a user's home feed.
    ///
    /// Falls back to the first few catalog books on a live failure.
    #[instrument(skip(self))]
    pub async fn for_user(&self, user_id: &UserId) -> Sourced<Vec<Book>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::recommended_books(FALLBACK_COUNT));
        }

        match self
            .client
            .get::<Vec<Book>, ()>(&format!("/reco/user/{}", user_id.as_str()), None)
            .await
        {
            Ok(books) => Sourced::Live(books),
            Err(cause) => {
                warn!(error = %cause, user_id = %user_id, "User recommendations failed");
                Sourced::Degraded(fixtures::recommended_books(FALLBACK_COUNT), cause)
            }
        }
    }

    /// "Readers also bought" list for a book's detail page.
    #[instrument(skip(self))]
    pub async fn similar_to(&self, book_id: &BookId) -> Sourced<Vec<Book>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::recommended_books(FALLBACK_COUNT));
        }

        match self
            .client
            .get::<Vec<Book>, ()>(&format!("/reco/book/{}", book_id.as_str()), None)
            .await
        {
            Ok(books) => Sourced::Live(books),
            Err(cause) => {
                warn!(error = %cause, book_id = %book_id, "Similar-book recommendations failed");
                Sourced::Degraded(fixtures::recommended_books(FALLBACK_COUNT), cause)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::session::{MemoryCredentialStore, SessionEvents};

    #[tokio::test]
    async fn test_fixture_recommendations_are_bounded() {
        let config = BackendConfig::fixtures();
        let client =
            ApiClient::new(&config, MemoryCredentialStore::shared(), SessionEvents::new())
                .unwrap();
        let reco = RecommendationService::new(client, config.mode);

        let feed = reco.for_user(&UserId::new("user-1")).await;
        assert_eq!(feed.data().len(), FALLBACK_COUNT);

        let similar = reco.similar_to(&BookId::new("1")).await;
        assert_eq!(similar.data().len(), FALLBACK_COUNT);
    }
}
