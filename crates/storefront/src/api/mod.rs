//! Data-access facade for the bookstore backend gateway.
//!
//! # Architecture
//!
//! - One service struct per business domain (catalog, search, cart,
//!   recommendations, reviews, pricing, payments, shipping, orders,
//!   profile, auth), all sharing one [`ApiClient`].
//! - [`DataMode`](crate::config::DataMode) is injected at construction:
//!   fixture mode synthesizes results from the in-memory catalog, live
//!   mode calls the gateway over REST.
//! - In-memory caching via `moka` for live-mode catalog reads (5 minute TTL).
//!
//! # Result contract
//!
//! No facade operation ever returns `Err`. Every operation yields a
//! [`Sourced<T>`]: live data, fixture data, or fixture/neutral data
//! substituted after a live failure (`Degraded`, carrying the cause).
//! The presentation layer only ever branches on empty results; tests and
//! telemetry can still tell substituted data apart.
//!
//! # Example
//!
//! ```rust,ignore
//! use paperback_storefront::api::Storefront;
//! use paperback_storefront::config::BackendConfig;
//! use paperback_storefront::session::{MemoryCredentialStore, SessionEvents};
//!
//! let store = MemoryCredentialStore::shared();
//! let events = SessionEvents::new();
//! let shop = Storefront::new(&BackendConfig::fixtures(), store, events)?;
//!
//! let page = shop.catalog.list_books(1, 12).await;
//! for book in &page.data().data {
//!     println!("{} - {}", book.title, book.price);
//! }
//! ```

mod client;
mod fixtures;
mod types;

mod auth;
mod books;
mod cart;
mod orders;
mod payments;
mod pricing;
mod recommendations;
mod reviews;
mod search;
mod shipping;
mod users;

pub use auth::{
    AuthService, PasswordStrength, RegistrationError, RegistrationInput, password_strength,
};
pub use books::CatalogService;
pub use cart::CartService;
pub use client::ApiClient;
pub use fixtures::VALID_COUPONS;
pub use orders::OrderService;
pub use payments::PaymentService;
pub use pricing::PricingService;
pub use recommendations::RecommendationService;
pub use reviews::{NewReview, ReviewService};
pub use search::SearchService;
pub use shipping::ShippingService;
pub use types::*;
pub use users::ProfileService;

use std::sync::Arc;

use thiserror::Error;

use crate::config::BackendConfig;
use crate::session::{CredentialStore, SessionEvents};

/// Errors that can occur when calling the backend gateway.
///
/// These never cross the facade boundary as `Err`; they travel inside
/// [`Sourced::Degraded`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: network unreachable, connect error, or timeout.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    #[error("Gateway returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt (truncated for logging).
        body: String,
    },

    /// The stored credential was rejected (401). The credential has been
    /// cleared and a session-expired event emitted before this surfaces.
    #[error("Unauthorized")]
    Unauthorized,

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A facade result tagged with where its data came from.
///
/// `Degraded` preserves the no-throw guarantee of the facade while letting
/// callers distinguish a real empty result from a substituted one.
#[derive(Debug)]
pub enum Sourced<T> {
    /// Data returned by the live gateway.
    Live(T),
    /// Data synthesized from the fixture catalog (fixture mode).
    Fixture(T),
    /// Fallback data substituted after a live-mode failure.
    Degraded(T, ApiError),
}

impl<T> Sourced<T> {
    /// Borrow the payload regardless of origin.
    pub const fn data(&self) -> &T {
        match self {
            Self::Live(data) | Self::Fixture(data) | Self::Degraded(data, _) => data,
        }
    }

    /// Consume and return the payload regardless of origin.
    pub fn into_data(self) -> T {
        match self {
            Self::Live(data) | Self::Fixture(data) | Self::Degraded(data, _) => data,
        }
    }

    /// True when the payload was substituted after a live failure.
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(..))
    }

    /// The failure that caused a substitution, if any.
    pub const fn degradation_cause(&self) -> Option<&ApiError> {
        match self {
            Self::Degraded(_, cause) => Some(cause),
            _ => None,
        }
    }

    /// Map the payload, preserving the origin tag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        match self {
            Self::Live(data) => Sourced::Live(f(data)),
            Self::Fixture(data) => Sourced::Fixture(f(data)),
            Self::Degraded(data, cause) => Sourced::Degraded(f(data), cause),
        }
    }
}

// =============================================================================
// Storefront
// =============================================================================

/// The full set of per-domain services, built over one shared client.
///
/// Construction is cheap; services clone the `Arc`-backed client handle.
pub struct Storefront {
    pub catalog: CatalogService,
    pub search: SearchService,
    pub cart: CartService,
    pub recommendations: RecommendationService,
    pub reviews: ReviewService,
    pub pricing: PricingService,
    pub payments: PaymentService,
    pub shipping: ShippingService,
    pub orders: OrderService,
    pub profile: ProfileService,
    pub auth: AuthService,
}

impl Storefront {
    /// Build every service from one configuration.
    ///
    /// `credentials` backs the bearer header on live requests; `events`
    /// receives [`SessionEvent::Expired`](crate::session::SessionEvent)
    /// when the gateway rejects the credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        config: &BackendConfig,
        credentials: Arc<dyn CredentialStore>,
        events: SessionEvents,
    ) -> Result<Self, ApiError> {
        let client = ApiClient::new(config, credentials, events)?;
        let mode = config.mode;

        Ok(Self {
            catalog: CatalogService::new(client.clone(), mode),
            search: SearchService::new(client.clone(), mode),
            cart: CartService::new(client.clone(), mode),
            recommendations: RecommendationService::new(client.clone(), mode),
            reviews: ReviewService::new(client.clone(), mode),
            pricing: PricingService::new(client.clone(), mode),
            payments: PaymentService::new(client.clone(), mode),
            shipping: ShippingService::new(client.clone(), mode),
            orders: OrderService::new(client.clone(), mode),
            profile: ProfileService::new(client.clone(), mode),
            auth: AuthService::new(client, mode),
        })
    }
}
