//! A full shopping session in fixture mode: browse, search, cart,
//! sign-in, checkout, and post-purchase lookups, all without a network.

#![allow(clippy::unwrap_used)]

use paperback_core::{Price, UserId};
use paperback_storefront::api::{SearchFilters, SortKey, Sourced, Storefront};
use paperback_storefront::config::BackendConfig;
use paperback_storefront::session::{AuthSession, MemoryCredentialStore, SessionEvents};
use secrecy::SecretString;

#[tokio::test]
async fn test_shopping_flow_end_to_end() {
    let store = MemoryCredentialStore::shared();
    let session = AuthSession::new(store.clone());
    let shop = Storefront::new(&BackendConfig::fixtures(), store, SessionEvents::new()).unwrap();
    let user = UserId::new("user-1");

    // Browse the first page.
    let page = shop.catalog.list_books(1, 6).await;
    assert!(matches!(page, Sourced::Fixture(_)));
    assert_eq!(page.data().data.len(), 6);
    assert!(page.data().has_more);

    // Search for something affordable and in stock.
    let results = shop
        .search
        .search(
            "the",
            &SearchFilters {
                max_price: Some(Price::from_cents(2000)),
                in_stock_only: Some(true),
                sort_by: Some(SortKey::Price),
                ..SearchFilters::default()
            },
        )
        .await;
    assert!(!results.data().data.is_empty());
    let chosen = results.data().data.first().unwrap().clone();

    // Inspect the detail page data.
    let detail = shop.catalog.get_book(&chosen.id).await;
    assert_eq!(detail.data().as_ref().unwrap().id, chosen.id);
    let rating = shop.reviews.rating_for(&chosen.id).await;
    assert!(rating.data().total_ratings > 0);
    let similar = shop.recommendations.similar_to(&chosen.id).await;
    assert!(!similar.data().is_empty());

    // Sign in; any credentials work in fixture mode.
    let login = shop
        .auth
        .login("reader@example.com", &SecretString::from("hunter2hunter2"))
        .await;
    let response = login.data().as_ref().unwrap();
    session.login(&response.token, &response.name, &response.email);
    assert!(session.is_authenticated());

    // Put the book in the cart and validate a coupon.
    assert!(shop.cart.add_item(&user, &chosen.id, 1).await.data().success);
    let coupon = shop.pricing.validate_coupon("BOOKWORM", &user).await;
    assert!(coupon.data().valid);
    let quote = shop
        .pricing
        .quote(&chosen.id, &user, 1, Some("BOOKWORM"))
        .await;
    assert!(quote.data().total < quote.data().price);

    // Check out.
    let receipt = shop.cart.checkout(&user).await;
    let order_id = receipt.data().order_id.clone().unwrap();

    // Post-purchase: look the order up and track its shipment.
    let order = shop.orders.get(&order_id).await;
    let order = order.data().clone().unwrap();
    assert_eq!(order.id, order_id);
    let tracking_number = order.tracking_number.clone().unwrap();
    let tracking = shop.shipping.track(&tracking_number).await;
    assert_eq!(
        tracking.data().as_ref().unwrap().tracking_number,
        tracking_number
    );

    // Sign out again.
    session.logout();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_fixture_mode_never_degrades() {
    let shop = Storefront::new(
        &BackendConfig::fixtures(),
        MemoryCredentialStore::shared(),
        SessionEvents::new(),
    )
    .unwrap();
    let user = UserId::new("user-1");

    assert!(!shop.catalog.list_books(1, 12).await.is_degraded());
    assert!(!shop.cart.get_cart(&user).await.is_degraded());
    assert!(!shop.orders.history(&user).await.is_degraded());
    assert!(!shop.profile.get_profile(&user).await.is_degraded());
}
