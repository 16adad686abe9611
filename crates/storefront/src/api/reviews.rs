//! Book reviews and aggregate ratings.

use paperback_core::{BookId, UserId};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::config::DataMode;

use super::client::ApiClient;
use super::fixtures;
use super::types::{RatingSummary, Review, ReviewReceipt};
use super::Sourced;

#[derive(Clone)]
pub struct ReviewService {
    client: ApiClient,
    mode: DataMode,
}

/// A review as submitted; the gateway assigns the id and timestamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub book_id: BookId,
    pub user_id: UserId,
    pub user_name: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub text: String,
}

impl ReviewService {
    pub(super) fn new(client: ApiClient, mode: DataMode) -> Self {
        Self { client, mode }
    }

    /// Reviews for a book, newest first.
    ///
    /// Falls back to an empty list on a live failure; canned reviews are
    /// only ever served in fixture mode.
    #[instrument(skip(self))]
    pub async fn reviews_for(&self, book_id: &BookId) -> Sourced<Vec<Review>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::demo_reviews(book_id));
        }

        match self
            .client
            .get::<Vec<Review>, ()>(&format!("/reviews/book/{}", book_id.as_str()), None)
            .await
        {
            Ok(reviews) => Sourced::Live(reviews),
            Err(cause) => {
                warn!(error = %cause, book_id = %book_id, "Review fetch failed");
                Sourced::Degraded(Vec::new(), cause)
            }
        }
    }

    /// Submit a review.
    ///
    /// A failed submission degrades to `success: false`; it never pretends
    /// the review was stored.
    #[instrument(skip(self, review))]
    pub async fn submit(&self, review: &NewReview) -> Sourced<ReviewReceipt> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(ReviewReceipt {
                success: true,
                review_id: None,
            });
        }

        match self.client.post("/reviews", review).await {
            Ok(receipt) => Sourced::Live(receipt),
            Err(cause) => {
                warn!(error = %cause, book_id = %review.book_id, "Review submission failed");
                Sourced::Degraded(
                    ReviewReceipt {
                        success: false,
                        review_id: None,
                    },
                    cause,
                )
            }
        }
    }

    /// Aggregate rating for a book.
    ///
    /// Falls back to a zeroed summary on a live failure so the UI renders
    /// "no ratings yet" rather than stale numbers.
    #[instrument(skip(self))]
    pub async fn rating_for(&self, book_id: &BookId) -> Sourced<RatingSummary> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::demo_rating(book_id));
        }

        match self
            .client
            .get::<RatingSummary, ()>(&format!("/ratings/book/{}", book_id.as_str()), None)
            .await
        {
            Ok(summary) => Sourced::Live(summary),
            Err(cause) => {
                warn!(error = %cause, book_id = %book_id, "Rating fetch failed");
                Sourced::Degraded(fixtures::neutral_rating(book_id), cause)
            }
        }
    }
}
