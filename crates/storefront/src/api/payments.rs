//! Payment intents: create, confirm, look up.
//!
//! Fixture mode synthesizes a happy-path intent lifecycle so checkout
//! flows can be exercised end to end without a gateway.

use paperback_core::{OrderId, PaymentIntentId, Price};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::config::DataMode;

use super::client::ApiClient;
use super::fixtures;
use super::types::{PaymentConfirmation, PaymentIntent};
use super::Sourced;

#[derive(Clone)]
pub struct PaymentService {
    client: ApiClient,
    mode: DataMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IntentBody<'a> {
    order_id: &'a OrderId,
    amount: Price,
    currency: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmBody<'a> {
    intent_id: &'a PaymentIntentId,
    method: &'a str,
}

impl PaymentService {
    pub(super) fn new(client: ApiClient, mode: DataMode) -> Self {
        Self { client, mode }
    }

    /// Create a payment intent for an order.
    ///
    /// Falls back to a synthesized pending intent on a live failure; the
    /// confirm step will surface the real outcome.
    #[instrument(skip(self))]
    pub async fn create_intent(
        &self,
        order_id: &OrderId,
        amount: Price,
        currency: &str,
    ) -> Sourced<PaymentIntent> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::demo_payment_intent(order_id, amount, currency));
        }

        let body = IntentBody {
            order_id,
            amount,
            currency,
        };
        match self.client.post("/payments/intent", &body).await {
            Ok(intent) => Sourced::Live(intent),
            Err(cause) => {
                warn!(error = %cause, order_id = %order_id, "Payment intent creation failed");
                Sourced::Degraded(
                    fixtures::demo_payment_intent(order_id, amount, currency),
                    cause,
                )
            }
        }
    }

    /// Confirm (capture) a payment intent with the chosen method.
    ///
    /// A failed live confirmation degrades to `Failed`, never to a
    /// synthesized success.
    #[instrument(skip(self))]
    pub async fn confirm(
        &self,
        intent_id: &PaymentIntentId,
        method: &str,
    ) -> Sourced<PaymentConfirmation> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::demo_payment_confirmation(intent_id));
        }

        match self
            .client
            .post("/payments/confirm", &ConfirmBody { intent_id, method })
            .await
        {
            Ok(confirmation) => Sourced::Live(confirmation),
            Err(cause) => {
                warn!(error = %cause, intent_id = %intent_id, "Payment confirmation failed");
                Sourced::Degraded(
                    PaymentConfirmation {
                        intent_id: intent_id.clone(),
                        status: paperback_core::PaymentStatus::Failed,
                    },
                    cause,
                )
            }
        }
    }

    /// Look up the current state of a payment.
    ///
    /// `None` when the payment cannot be fetched; no state is synthesized
    /// for a live payment.
    #[instrument(skip(self))]
    pub async fn status(&self, payment_id: &PaymentIntentId) -> Sourced<Option<PaymentIntent>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(Some(fixtures::demo_payment(payment_id)));
        }

        match self
            .client
            .get::<PaymentIntent, ()>(&format!("/payments/{}", payment_id.as_str()), None)
            .await
        {
            Ok(intent) => Sourced::Live(Some(intent)),
            Err(cause) => {
                warn!(error = %cause, payment_id = %payment_id, "Payment lookup failed");
                Sourced::Degraded(None, cause)
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
    use paperback_core::PaymentStatus;

    fn fixture_payments() -> PaymentService {
        let config = BackendConfig::fixtures();
        let client =
            ApiClient::new(&config, MemoryCredentialStore::shared(), SessionEvents::new())
                .unwrap();
        PaymentService::new(client, config.mode)
    }

    #[tokio::test]
    async fn test_fixture_intent_lifecycle() {
        let payments = fixture_payments();
        let order_id = OrderId::new("ORD001");

        let intent = payments
            .create_intent(&order_id, Price::from_cents(3349), "USD")
            .await;
        assert_eq!(intent.data().status, PaymentStatus::Pending);
        assert_eq!(intent.data().order_id, order_id);
        assert!(intent.data().id.as_str().starts_with("pi_"));

        let confirmation = payments.confirm(&intent.data().id, "card").await;
        assert_eq!(confirmation.data().status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_fixture_status_lookup() {
        let payments = fixture_payments();
        let id = PaymentIntentId::new("pi_123");
        let intent = payments.status(&id).await;
        let intent = intent.data().as_ref().unwrap();
        assert_eq!(intent.id, id);
        assert_eq!(intent.status, PaymentStatus::Completed);
    }
}
