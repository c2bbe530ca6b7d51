//! Integration tests for atomic checkout.
//!
//! Run with: cargo test -p cartify-integration-tests -- --ignored

use cartify_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

fn unique_title(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4().simple())
}

async fn checkout(
    ctx: &TestContext,
    token: &str,
    key: Uuid,
    payment_id: &str,
) -> (StatusCode, Value) {
    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .bearer_auth(token)
        .json(&json!({ "idempotencyKey": key, "paymentId": payment_id }))
        .send()
        .await
        .expect("checkout request failed");
    let status = resp.status();
    let body: Value = resp.json().await.expect("checkout body not json");
    (status, body)
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_checkout_decrements_stock_and_clears_cart() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;
    let title = unique_title("Atomic");
    let product = ctx.create_product(&title, 15.00, 10).await;

    ctx.add_to_cart(&user, product, &title, 15.00, 3).await;

    let (status, body) = checkout(&ctx, &user.token, Uuid::new_v4(), "pay_test_1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"].as_bool(), Some(true));
    assert_eq!(body["replayed"].as_bool(), Some(false));
    assert_eq!(body["order"]["billAmount"].as_f64(), Some(45.0));
    assert!(
        body["order"]["orderId"]
            .as_str()
            .is_some_and(|id| id.starts_with("ORD"))
    );

    assert_eq!(ctx.stock_of(product).await, 7);

    // Cart was emptied as part of the same transaction
    let cart: Value = ctx
        .client
        .get(ctx.url("/api/cart"))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("get cart failed")
        .json()
        .await
        .expect("cart body not json");
    assert_eq!(cart["cart"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_checkout_replay_returns_original_order() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;
    let title = unique_title("Replay");
    let product = ctx.create_product(&title, 8.00, 10).await;

    ctx.add_to_cart(&user, product, &title, 8.00, 2).await;

    let key = Uuid::new_v4();
    let (status, first) = checkout(&ctx, &user.token, key, "pay_test_2").await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = first["order"]["orderId"].as_str().expect("orderId");

    // Same key again: no new order, no further stock movement.
    let (status, second) = checkout(&ctx, &user.token, key, "pay_test_2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["replayed"].as_bool(), Some(true));
    assert_eq!(second["order"]["orderId"].as_str(), Some(order_id));

    assert_eq!(ctx.stock_of(product).await, 8);
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_checkout_replay_is_scoped_to_the_buyer() {
    let ctx = TestContext::new();
    let buyer = ctx.register_user().await;
    let other = ctx.register_user().await;
    let title = unique_title("Private");
    let product = ctx.create_product(&title, 20.00, 10).await;

    ctx.add_to_cart(&buyer, product, &title, 20.00, 1).await;
    ctx.add_to_cart(&other, product, &title, 20.00, 2).await;

    let key = Uuid::new_v4();
    let (status, first) = checkout(&ctx, &buyer.token, key, "pay_test_6").await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = first["order"]["orderId"].as_str().expect("orderId");

    // Another account presenting the buyer's key must not see their order.
    // The key is already taken, so the attempt is rejected as contention.
    let (status, body) = checkout(&ctx, &other.token, key, "pay_test_6").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"].as_str(),
        Some("Checkout already in progress")
    );
    assert!(body.get("order").is_none());

    // The rejected attempt rolled back: stock only moved for the buyer and
    // the other account's cart is still there for a retry under its own key.
    assert_eq!(ctx.stock_of(product).await, 9);

    let (status, body) = checkout(&ctx, &other.token, Uuid::new_v4(), "pay_test_7").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["replayed"].as_bool(), Some(false));
    assert!(body["order"]["orderId"].as_str() != Some(order_id));
    assert_eq!(ctx.stock_of(product).await, 7);
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_checkout_empty_cart_rejected() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;

    let (status, body) = checkout(&ctx, &user.token, Uuid::new_v4(), "pay_test_3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"].as_str(), Some("Cart is empty"));
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_checkout_insufficient_stock_mutates_nothing() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;
    let title_a = unique_title("Stocked");
    let title_b = unique_title("Scarce");
    let p1 = ctx.create_product(&title_a, 5.00, 10).await;
    let p2 = ctx.create_product(&title_b, 5.00, 1).await;

    ctx.add_to_cart(&user, p1, &title_a, 5.00, 2).await;
    ctx.add_to_cart(&user, p2, &title_b, 5.00, 3).await;

    let (status, body) = checkout(&ctx, &user.token, Uuid::new_v4(), "pay_test_4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"].as_str(),
        Some(format!("Insufficient quantity for product {title_b}").as_str())
    );

    // Unlike the legacy batch, nothing moved: not even the passing line.
    assert_eq!(ctx.stock_of(p1).await, 10);
    assert_eq!(ctx.stock_of(p2).await, 1);

    // The cart is intact so the shopper can amend it.
    let cart: Value = ctx
        .client
        .get(ctx.url("/api/cart"))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("get cart failed")
        .json()
        .await
        .expect("cart body not json");
    assert_eq!(cart["cart"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_checkout_detects_price_drift() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;
    let title = unique_title("Repriced");
    let product = ctx.create_product(&title, 10.00, 10).await;

    ctx.add_to_cart(&user, product, &title, 10.00, 1).await;

    // Price changes after the line was snapshotted into the cart.
    let resp = ctx
        .client
        .put(ctx.url(&format!("/api/products/{product}")))
        .json(&json!({ "price": 12.50 }))
        .send()
        .await
        .expect("reprice failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, body) = checkout(&ctx, &user.token, Uuid::new_v4(), "pay_test_5").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"].as_str(),
        Some(format!("Price of {title} changed, please review your cart").as_str())
    );

    assert_eq!(ctx.stock_of(product).await, 10);
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_concurrent_checkouts_never_oversell() {
    let ctx = TestContext::new();
    let title = unique_title("Contended");
    let product = ctx.create_product(&title, 5.00, 6).await;

    // 5 shoppers each want 2 units of a 6-unit product. At most 3 can win.
    let mut users = Vec::new();
    for _ in 0..5 {
        let user = ctx.register_user().await;
        ctx.add_to_cart(&user, product, &title, 5.00, 2).await;
        users.push(user);
    }

    let mut handles = Vec::new();
    for user in users {
        let base_url = ctx.base_url.clone();
        handles.push(tokio::spawn(async move {
            let ctx = TestContext {
                base_url,
                client: reqwest::Client::new(),
            };
            let (status, _) = checkout(&ctx, &user.token, Uuid::new_v4(), "pay_race").await;
            status
        }));
    }

    // A loser sees 400 (insufficient stock); anything that rolled back for
    // another reason is also just a loss. Only commits move stock.
    let mut wins = 0;
    for handle in handles {
        let status = handle.await.expect("checkout task panicked");
        if status == StatusCode::CREATED {
            wins += 1;
        }
    }

    let remaining = ctx.stock_of(product).await;
    assert!((1..=3).contains(&wins));
    assert_eq!(remaining, 6 - 2 * wins);
}
