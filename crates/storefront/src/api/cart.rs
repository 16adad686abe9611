//! Shopping cart reads, mutations, and checkout.
//!
//! Mutation fallbacks differ from read fallbacks: a failed read degrades
//! to fixture or empty-cart data, but a failed mutation degrades to a
//! `success: false` receipt. A substituted "it worked" would let the UI
//! drift from the gateway's actual cart state.

use paperback_core::{BookId, UserId};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::config::DataMode;

use super::client::ApiClient;
use super::fixtures;
use super::types::{Cart, CheckoutReceipt, MutationReceipt};
use super::Sourced;

/// Cart operations for a signed-in user.
#[derive(Clone)]
pub struct CartService {
    client: ApiClient,
    mode: DataMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddItemBody<'a> {
    book_id: &'a BookId,
    quantity: u32,
}

#[derive(Serialize)]
struct QuantityBody {
    quantity: u32,
}

impl CartService {
    pub(super) fn new(client: ApiClient, mode: DataMode) -> Self {
        Self { client, mode }
    }

    /// Fetch the user's cart.
    ///
    /// Falls back to an empty cart on a live failure; fixture mode returns
    /// the three-line demo cart.
    #[instrument(skip(self))]
    pub async fn get_cart(&self, user_id: &UserId) -> Sourced<Cart> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::demo_cart(user_id));
        }

        match self
            .client
            .get::<Cart, ()>(&format!("/cart/{}", user_id.as_str()), None)
            .await
        {
            Ok(cart) => Sourced::Live(cart),
            Err(cause) => {
                warn!(error = %cause, user_id = %user_id, "Cart fetch failed, serving empty cart");
                Sourced::Degraded(fixtures::empty_cart(user_id), cause)
            }
        }
    }

    /// Add `quantity` copies of a book to the cart.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        quantity: u32,
    ) -> Sourced<MutationReceipt> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(MutationReceipt::APPLIED);
        }

        let path = format!("/cart/{}/items", user_id.as_str());
        match self
            .client
            .post(&path, &AddItemBody { book_id, quantity })
            .await
        {
            Ok(receipt) => Sourced::Live(receipt),
            Err(cause) => {
                warn!(error = %cause, book_id = %book_id, "Cart add failed");
                Sourced::Degraded(MutationReceipt::NOT_APPLIED, cause)
            }
        }
    }

    /// Set the quantity of an existing cart line.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        user_id: &UserId,
        book_id: &BookId,
        quantity: u32,
    ) -> Sourced<MutationReceipt> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(MutationReceipt::APPLIED);
        }

        let path = format!("/cart/{}/items/{}", user_id.as_str(), book_id.as_str());
        match self.client.put(&path, &QuantityBody { quantity }).await {
            Ok(receipt) => Sourced::Live(receipt),
            Err(cause) => {
                warn!(error = %cause, book_id = %book_id, "Cart quantity update failed");
                Sourced::Degraded(MutationReceipt::NOT_APPLIED, cause)
            }
        }
    }

    /// Remove a line from the cart.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        user_id: &UserId,
        book_id: &BookId,
    ) -> Sourced<MutationReceipt> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(MutationReceipt::APPLIED);
        }

        let path = format!("/cart/{}/items/{}", user_id.as_str(), book_id.as_str());
        match self.client.delete(&path).await {
            Ok(receipt) => Sourced::Live(receipt),
            Err(cause) => {
                warn!(error = %cause, book_id = %book_id, "Cart remove failed");
                Sourced::Degraded(MutationReceipt::NOT_APPLIED, cause)
            }
        }
    }

    /// Empty the cart entirely.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self, user_id: &UserId) -> Sourced<MutationReceipt> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(MutationReceipt::APPLIED);
        }

        match self
            .client
            .delete(&format!("/cart/{}", user_id.as_str()))
            .await
        {
            Ok(receipt) => Sourced::Live(receipt),
            Err(cause) => {
                warn!(error = %cause, user_id = %user_id, "Cart clear failed");
                Sourced::Degraded(MutationReceipt::NOT_APPLIED, cause)
            }
        }
    }

    /// Convert the cart into an order.
    ///
    /// A receipt without an order id means no order was placed.
    #[instrument(skip(self))]
    pub async fn checkout(&self, user_id: &UserId) -> Sourced<CheckoutReceipt> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(CheckoutReceipt {
                order_id: Some(fixtures::minted_order_id()),
            });
        }

        match self
            .client
            .post_empty(&format!("/cart/{}/checkout", user_id.as_str()))
            .await
        {
            Ok(receipt) => Sourced::Live(receipt),
            Err(cause) => {
                warn!(error = %cause, user_id = %user_id, "Checkout failed");
                Sourced::Degraded(CheckoutReceipt { order_id: None }, cause)
            }
        }
    }
}
