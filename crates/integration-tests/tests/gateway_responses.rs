//! Live-mode handling of well-formed, malformed, and failing gateway
//! responses.

#![allow(clippy::unwrap_used)]

use paperback_core::BookId;
use paperback_integration_tests::StubGateway;
use paperback_storefront::api::{ApiError, Storefront};
use paperback_storefront::config::BackendConfig;
use paperback_storefront::session::{MemoryCredentialStore, SessionEvents};
use serde_json::json;

fn storefront_for(base_url: &str) -> Storefront {
    let config = BackendConfig::live(base_url).unwrap();
    Storefront::new(&config, MemoryCredentialStore::shared(), SessionEvents::new()).unwrap()
}

#[tokio::test]
async fn test_successful_response_is_tagged_live() {
    let body = json!({
        "data": [{
            "_id": "42",
            "title": "A Field Guide",
            "author": "R. Chandler",
            "description": "desc",
            "price": 19.99,
            "category": "Non-Fiction",
            "coverImage": "/covers/42.jpg",
            "rating": 4.5,
            "reviewCount": 10,
            "inStock": true,
            "stockCount": 3
        }],
        "total": 1,
        "page": 1,
        "limit": 12,
        "hasMore": false
    })
    .to_string();
    let gateway = StubGateway::start(200, &body).await;

    let shop = storefront_for(&gateway.base_url);
    let page = shop.catalog.list_books(1, 12).await;

    assert!(!page.is_degraded());
    assert_eq!(page.data().total, 1);
    let book = page.data().data.first().unwrap();
    assert_eq!(book.id, BookId::new("42"));
    assert_eq!(book.title, "A Field Guide");
}

#[tokio::test]
async fn test_server_error_degrades_with_status_cause() {
    let gateway = StubGateway::start(500, r#"{"error":"boom"}"#).await;

    let shop = storefront_for(&gateway.base_url);
    let page = shop.catalog.list_books(1, 12).await;

    assert!(page.is_degraded());
    match page.degradation_cause() {
        Some(ApiError::Status { status, body }) => {
            assert_eq!(*status, 500);
            assert!(body.contains("boom"));
        }
        other => panic!("expected status cause, got {other:?}"),
    }
    // The fallback is still a full fixture page.
    assert_eq!(page.data().data.len(), 12);
}

#[tokio::test]
async fn test_malformed_body_degrades_with_parse_cause() {
    let gateway = StubGateway::start(200, "this is not json").await;

    let shop = storefront_for(&gateway.base_url);
    let page = shop.catalog.list_books(1, 12).await;

    assert!(page.is_degraded());
    assert!(matches!(
        page.degradation_cause(),
        Some(ApiError::Parse(_))
    ));
}
