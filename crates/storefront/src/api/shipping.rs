//! Shipping quotes, shipment creation, and package tracking.

use paperback_core::{OrderId, TrackingNumber};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::config::DataMode;

use super::client::ApiClient;
use super::fixtures;
use super::types::{Address, Shipment, ShippingQuote, TrackingInfo};
use super::Sourced;

#[derive(Clone)]
pub struct ShippingService {
    client: ApiClient,
    mode: DataMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuoteBody<'a> {
    order_id: &'a OrderId,
    address: &'a Address,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShipBody<'a> {
    order_id: &'a OrderId,
    address: &'a Address,
}

impl ShippingService {
    pub(super) fn new(client: ApiClient, mode: DataMode) -> Self {
        Self { client, mode }
    }

    /// Quote shipping options for an order to a destination address.
    ///
    /// Falls back to the flat fixture rate card on a live failure.
    #[instrument(skip(self, address))]
    pub async fn quote(&self, order_id: &OrderId, address: &Address) -> Sourced<ShippingQuote> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(fixtures::shipping_rate_card());
        }

        match self
            .client
            .post("/shipping/quote", &QuoteBody { order_id, address })
            .await
        {
            Ok(quote) => Sourced::Live(quote),
            Err(cause) => {
                warn!(error = %cause, order_id = %order_id, "Shipping quote failed, using flat rate card");
                Sourced::Degraded(fixtures::shipping_rate_card(), cause)
            }
        }
    }

    /// Create a shipment for an order and obtain a tracking number.
    ///
    /// `None` when the shipment could not be created; no tracking number
    /// is ever synthesized for a live order.
    #[instrument(skip(self, address))]
    pub async fn ship(&self, order_id: &OrderId, address: &Address) -> Sourced<Option<Shipment>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(Some(fixtures::demo_shipment()));
        }

        let body = ShipBody { order_id, address };
        match self.client.post("/shipping/ship", &body).await {
            Ok(shipment) => Sourced::Live(Some(shipment)),
            Err(cause) => {
                warn!(error = %cause, order_id = %order_id, "Shipment creation failed");
                Sourced::Degraded(None, cause)
            }
        }
    }

    /// Tracking history for a tracking number.
    ///
    /// `None` when the history cannot be fetched; fixture mode synthesizes
    /// an in-transit history.
    #[instrument(skip(self))]
    pub async fn track(&self, tracking_number: &TrackingNumber) -> Sourced<Option<TrackingInfo>> {
        if self.mode.is_fixtures() {
            return Sourced::Fixture(Some(fixtures::demo_tracking(tracking_number)));
        }

        match self
            .client
            .get::<TrackingInfo, ()>(
                &format!("/shipping/track/{}", tracking_number.as_str()),
                None,
            )
            .await
        {
            Ok(info) => Sourced::Live(Some(info)),
            Err(cause) => {
                warn!(error = %cause, tracking = %tracking_number, "Tracking lookup failed");
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
    use paperback_core::{AddressId, Price};

    fn fixture_shipping() -> ShippingService {
        let config = BackendConfig::fixtures();
        let client =
            ApiClient::new(&config, MemoryCredentialStore::shared(), SessionEvents::new())
                .unwrap();
        ShippingService::new(client, config.mode)
    }

    fn destination() -> Address {
        Address {
            id: AddressId::new("1"),
            street: "123 Main St".to_string(),
            city: "Huntington Beach".to_string(),
            state: "CA".to_string(),
            postal_code: "92648".to_string(),
            country: "United States".to_string(),
            is_default: true,
        }
    }

    #[tokio::test]
    async fn test_fixture_rate_card() {
        let shipping = fixture_shipping();
        let quote = shipping.quote(&OrderId::new("ORD001"), &destination()).await;

        assert_eq!(quote.data().standard_shipping, Price::from_cents(599));
        assert_eq!(quote.data().express_shipping, Price::from_cents(1599));
        assert!(quote.data().express_shipping > quote.data().standard_shipping);
    }

    #[tokio::test]
    async fn test_fixture_ship_then_track() {
        let shipping = fixture_shipping();

        let shipment = shipping.ship(&OrderId::new("ORD001"), &destination()).await;
        let tracking_number = shipment.data().as_ref().unwrap().tracking_number.clone();
        assert!(tracking_number.as_str().starts_with("TRK"));

        let info = shipping.track(&tracking_number).await;
        let info = info.data().as_ref().unwrap();
        assert_eq!(info.tracking_number, tracking_number);
        assert_eq!(info.events.len(), 3);
        // Events are in chronological order.
        for pair in info.events.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
        }
    }
}
