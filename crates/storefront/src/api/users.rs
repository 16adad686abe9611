//! User profiles and wishlists.

use paperback_core::{BookId, UserId};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::config::DataMode;

use super::client::ApiClient;
use super::fixtures;
use super::types::{MutationReceipt, ProfileUpdate, UserProfile};
use super::Sourced;

#[derive(Clone)]
pub struct ProfileService {
    client: ApiClient,
    mode: DataMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WishlistBody<'a> {
    book_id: &'a BookId,
}

impl ProfileService {
    pub(super) fn new(client: ApiClient, mode: DataMode) -> Self {
        Self { client, mode }
    }

    /// Fetch a user's profile.
    ///
    /// Falls back to an empty guest profile on a live failure.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: &UserId) -> Sourced<UserProfile> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::demo_profile(user_id));
        }

        match self
            .client
            .get::<UserProfile, ()>(&format!("/users/{}/profile", user_id.as_str()), None)
            .await
        {
            Ok(profile) => Sourced::Live(profile),
            Err(cause) => {
                warn!(error = %cause, user_id = %user_id, "Profile fetch failed, serving guest profile");
                Sourced::Degraded(fixtures::guest_profile(user_id), cause)
            }
        }
    }

    /// Apply a partial profile update.
    ///
    /// A failed update degrades to `success: false`; it never pretends
    /// the profile changed.
    #[instrument(skip(self, update))]
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Sourced<MutationReceipt> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(MutationReceipt::APPLIED);
        }

        match self
            .client
            .put(&format!("/users/{}/profile", user_id.as_str()), update)
            .await
        {
            Ok(receipt) => Sourced::Live(receipt),
            Err(cause) => {
                warn!(error = %cause, user_id = %user_id, "Profile update failed");
                Sourced::Degraded(MutationReceipt::NOT_APPLIED, cause)
            }
        }
    }

    /// The user's wishlist, as book ids. Set semantics.
    ///
    /// Falls back to an empty wishlist on a live failure.
    #[instrument(skip(self))]
    pub async fn wishlist(&self, user_id: &UserId) -> Sourced<Vec<BookId>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::demo_wishlist());
        }

        match self
            .client
            .get::<Vec<BookId>, ()>(&format!("/users/{}/wishlist", user_id.as_str()), None)
            .await
        {
            Ok(wishlist) => Sourced::Live(wishlist),
            Err(cause) => {
                warn!(error = %cause, user_id = %user_id, "Wishlist fetch failed");
                Sourced::Degraded(Vec::new(), cause)
            }
        }
    }

    /// Add a book to the wishlist. Adding a book already present is a no-op
    /// success.
    #[instrument(skip(self))]
    pub async fn add_to_wishlist(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Sourced<MutationReceipt> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(MutationReceipt::APPLIED);
        }

        let path = format!("/users/{}/wishlist", user_id.as_str());
        match self.client.post(&path, &WishlistBody { book_id }).await {
            Ok(receipt) => Sourced::Live(receipt),
            Err(cause) => {
                warn!(error = %cause, book_id = %book_id, "Wishlist add failed");
                Sourced::Degraded(MutationReceipt::NOT_APPLIED, cause)
            }
        }
    }

    /// Remove a book from the wishlist.
    #[instrument(skip(self))]
    pub async fn remove_from_wishlist(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Sourced<MutationReceipt> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(MutationReceipt::APPLIED);
        }

        let path = format!(
            "/users/{}/wishlist/{}",
            user_id.as_str(),
            book_id.as_str()
        );
        match self.client.delete(&path).await {
            Ok(receipt) => Sourced::Live(receipt),
            Err(cause) => {
                warn!(error = %cause, book_id = %book_id, "Wishlist remove failed");
                Sourced::Degraded(MutationReceipt::NOT_APPLIED, cause)
            }
        }
    }
}
