//! Command implementations.

pub mod catalog;
pub mod shop;

use paperback_storefront::api::{Sourced, Storefront};
use paperback_storefront::config::BackendConfig;
use paperback_storefront::session::{MemoryCredentialStore, SessionEvents};

/// Build a storefront handle from the environment.
pub fn storefront() -> Result<Storefront, Box<dyn std::error::Error>> {
    let config = BackendConfig::from_env()?;
    let shop = Storefront::new(&config, MemoryCredentialStore::shared(), SessionEvents::new())?;
    Ok(shop)
}

/// Log when a result was substituted after a live failure.
pub fn note_degradation<T>(result: &Sourced<T>) {
    if let Some(cause) = result.degradation_cause() {
        tracing::warn!("Showing fallback data; the gateway call failed: {cause}");
    }
}
