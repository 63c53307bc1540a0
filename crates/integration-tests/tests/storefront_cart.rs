//! Cart fetch and mutation over HTTP against the mock backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use qkart_core::{CartEntry, CartLineItem, Cost, Product, ProductId, Rating};
use qkart_integration_tests::{MockBackend, Route, TOKEN};
use qkart_storefront::api::ApiClient;
use qkart_storefront::error::{ALREADY_IN_CART, CART_UPDATED, LOGIN_REQUIRED};
use qkart_storefront::notify::{self, Notifications, Severity};
use qkart_storefront::storage::{LocalStorage, TOKEN_KEY};
use qkart_storefront::{AddToCartOptions, StoreController, StoreError};
use rust_decimal::Decimal;

fn product(id: &str, name: &str, cost: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: "Sports".to_string(),
        cost: Cost::from_units(cost),
        rating: Rating::new(3).unwrap(),
        image_url: String::new(),
    }
}

fn catalog() -> Vec<Product> {
    vec![
        product("ball", "Football", 300),
        product("bat", "Cricket Bat", 1200),
        product("net", "Goal Net", 800),
    ]
}

async fn setup(
    backend: &MockBackend,
    token: Option<&str>,
) -> (StoreController<ApiClient>, Notifications) {
    let api = ApiClient::new(&backend.api_config()).unwrap();
    let storage = LocalStorage::ephemeral();
    if let Some(token) = token {
        storage.set(TOKEN_KEY, token).unwrap();
    }
    let (notifier, notifications) = notify::channel();
    let controller = StoreController::new(api, storage, notifier);
    controller.fetch_products().await.unwrap();
    (controller, notifications)
}

#[tokio::test]
async fn test_fetch_cart_reconciles_with_catalog() {
    let backend = MockBackend::start(catalog()).await;
    backend.set_cart(vec![CartEntry::new("bat", 2), CartEntry::new("ball", 1)]);
    let (controller, _notifications) = setup(&backend, Some(TOKEN)).await;

    let items = controller.fetch_cart().await.unwrap().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].product().unwrap().name, "Cricket Bat");
    assert_eq!(items[0].quantity(), 2);
    assert_eq!(items[1].product().unwrap().name, "Football");

    assert_eq!(controller.total_value().await, Decimal::from(2700));
    assert_eq!(controller.total_items().await, 2);
}

#[tokio::test]
async fn test_cart_entry_for_removed_product_is_orphaned() {
    let backend = MockBackend::start(catalog()).await;
    backend.set_cart(vec![CartEntry::new("net", 1), CartEntry::new("ball", 2)]);
    backend.remove_product(&ProductId::new("net"));
    let (controller, _notifications) = setup(&backend, Some(TOKEN)).await;

    let items = controller.fetch_cart().await.unwrap().unwrap();
    assert!(matches!(&items[0], CartLineItem::Orphaned { product_id, quantity: 1 }
        if product_id.as_str() == "net"));
    assert_eq!(controller.total_value().await, Decimal::from(600));
    assert_eq!(controller.total_items().await, 2);
}

#[tokio::test]
async fn test_add_then_update_then_remove() {
    let backend = MockBackend::start(catalog()).await;
    let (controller, mut notifications) = setup(&backend, Some(TOKEN)).await;
    let ball = ProductId::new("ball");
    let options = AddToCartOptions {
        prevent_duplicate: true,
    };

    let items = controller.add_to_cart(&ball, 1, options).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(backend.cart(), vec![CartEntry::new("ball", 1)]);

    controller
        .add_to_cart(&ball, 3, AddToCartOptions::default())
        .await
        .unwrap();
    assert_eq!(backend.cart(), vec![CartEntry::new("ball", 3)]);
    assert_eq!(controller.total_value().await, Decimal::from(900));

    let items = controller
        .add_to_cart(&ball, 0, AddToCartOptions::default())
        .await
        .unwrap();
    assert!(items.is_empty());
    assert!(backend.cart().is_empty());

    let messages = notifications.drain();
    assert_eq!(messages.len(), 3);
    assert!(
        messages
            .iter()
            .all(|n| n.severity == Severity::Success && n.message == CART_UPDATED)
    );
}

#[tokio::test]
async fn test_duplicate_add_is_rejected_without_request() {
    let backend = MockBackend::start(catalog()).await;
    backend.set_cart(vec![CartEntry::new("bat", 1)]);
    let (controller, mut notifications) = setup(&backend, Some(TOKEN)).await;
    controller.fetch_cart().await.unwrap();

    let err = controller
        .add_to_cart(
            &ProductId::new("bat"),
            1,
            AddToCartOptions {
                prevent_duplicate: true,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::DuplicateRejected(_)));
    assert_eq!(backend.hits(Route::UpdateCart), 0);
    let messages = notifications.drain();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].severity, Severity::Warning);
    assert_eq!(messages[0].message, ALREADY_IN_CART);
}

#[tokio::test]
async fn test_logged_out_add_sends_nothing() {
    let backend = MockBackend::start(catalog()).await;
    let (controller, mut notifications) = setup(&backend, None).await;

    let err = controller
        .add_to_cart(&ProductId::new("ball"), 1, AddToCartOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Unauthenticated));
    assert_eq!(controller.fetch_cart().await.unwrap(), None);
    assert_eq!(backend.hits(Route::UpdateCart), 0);
    assert_eq!(backend.hits(Route::FetchCart), 0);
    let messages = notifications.drain();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message, LOGIN_REQUIRED);
}

#[tokio::test]
async fn test_unknown_product_shows_backend_message() {
    let backend = MockBackend::start(catalog()).await;
    backend.set_cart(vec![CartEntry::new("ball", 1)]);
    let (controller, mut notifications) = setup(&backend, Some(TOKEN)).await;
    controller.fetch_cart().await.unwrap();
    let before = controller.cart_items().await;

    let err = controller
        .add_to_cart(&ProductId::new("ghost"), 1, AddToCartOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(&err, StoreError::BadRequest(message) if message == "Product doesn't exist"));
    assert_eq!(controller.cart_items().await, before);
    let messages = notifications.drain();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].severity, Severity::Error);
    assert_eq!(messages[0].message, "Product doesn't exist");
}

#[tokio::test]
async fn test_rejected_token_is_reported() {
    let backend = MockBackend::start(catalog()).await;
    let (controller, mut notifications) = setup(&backend, Some("expired")).await;

    let err = controller.fetch_cart().await.unwrap_err();
    assert!(matches!(err, StoreError::Connectivity(_)));
    assert_eq!(backend.hits(Route::FetchCart), 1);
    assert_eq!(notifications.drain().len(), 1);
}
