//! Price quotes and coupon validation.

use paperback_core::{BookId, UserId};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::config::DataMode;

use super::client::ApiClient;
use super::fixtures;
use super::types::{CouponValidation, PriceQuote};
use super::Sourced;

#[derive(Clone)]
pub struct PricingService {
    client: ApiClient,
    mode: DataMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteBody<'a> {
    book_id: &'a BookId,
    user_id: &'a UserId,
    qty: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    coupon: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CouponBody<'a> {
    code: &'a str,
    user_id: &'a UserId,
}

impl PricingService {
    pub(super) fn new(client: ApiClient, mode: DataMode) -> Self {
        Self { client, mode }
    }

    /// Quote a purchase of `qty` copies, optionally with a coupon code.
    ///
    /// Falls back to an all-zero quote on a live failure: pricing is the
    /// gateway's call, and a stale list price would misquote checkout.
    #[instrument(skip(self))]
    pub async fn quote(
        &self,
        book_id: &BookId,
        user_id: &UserId,
        qty: u32,
        coupon: Option<&str>,
    ) -> Sourced<PriceQuote> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::demo_quote(book_id, qty, coupon));
        }

        let body = QuoteBody {
            book_id,
            user_id,
            qty,
            coupon,
        };
        match self.client.post("/pricing/quote", &body).await {
            Ok(quote) => Sourced::Live(quote),
            Err(cause) => {
                warn!(error = %cause, book_id = %book_id, "Price quote failed");
                Sourced::Degraded(fixtures::neutral_quote(), cause)
            }
        }
    }

    /// Check whether a coupon code is valid and what it is worth.
    ///
    /// Falls back to "invalid" on a live failure: a substituted discount
    /// would promise money off that checkout cannot honor.
    #[instrument(skip(self))]
    pub async fn validate_coupon(&self, code: &str, user_id: &UserId) -> Sourced<CouponValidation> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::validate_coupon(code));
        }

        match self
            .client
            .post("/coupons/validate", &CouponBody { code, user_id })
            .await
        {
            Ok(validation) => Sourced::Live(validation),
            Err(cause) => {
                warn!(error = %cause, code, "Coupon validation failed, treating as invalid");
                Sourced::Degraded(fixtures::invalid_coupon(), cause)
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
    use paperback_core::Price;

    fn fixture_pricing() -> PricingService {
        let config = BackendConfig::fixtures();
        let client =
            ApiClient::new(&config, MemoryCredentialStore::shared(), SessionEvents::new())
                .unwrap();
        PricingService::new(client, config.mode)
    }

    #[tokio::test]
    async fn test_fixture_quote_totals_add_up() {
        let pricing = fixture_pricing();
        let quote = pricing
            .quote(&BookId::new("1"), &UserId::new("user-1"), 3, None)
            .await;

        let quote = quote.data();
        assert_eq!(
            quote.total,
            Price::new(quote.price.amount() - quote.discount.amount())
        );
    }

    #[tokio::test]
    async fn test_fixture_coupon_round_trip() {
        let pricing = fixture_pricing();
        let user = UserId::new("user-1");

        let accepted = pricing.validate_coupon("WELCOME", &user).await;
        assert!(accepted.data().valid);
        assert_eq!(accepted.data().discount_percent, 10);

        let rejected = pricing.validate_coupon("NOPE", &user).await;
        assert!(!rejected.data().valid);
    }
}
