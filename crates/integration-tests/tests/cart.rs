//! Integration tests for the cart endpoints.
//!
//! Run with: cargo test -p cartify-integration-tests -- --ignored

use cartify_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::Value;
use uuid::Uuid;

fn unique_title(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_cart_round_trip() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;
    let title = unique_title("Cart Item");
    let product = ctx.create_product(&title, 24.99, 10).await;

    // Fresh cart is empty
    let body: Value = ctx
        .client
        .get(ctx.url("/api/cart"))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("get cart failed")
        .json()
        .await
        .expect("cart body not json");
    assert_eq!(body["cart"].as_array().map(Vec::len), Some(0));

    // Add a line
    let body = ctx.add_to_cart(&user, product, &title, 24.99, 2).await;
    let cart = body["cart"].as_array().expect("cart array");
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0]["quantity"].as_i64(), Some(2));

    // Re-adding the same product replaces the quantity, it does not sum
    let body = ctx.add_to_cart(&user, product, &title, 24.99, 7).await;
    let cart = body["cart"].as_array().expect("cart array");
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0]["quantity"].as_i64(), Some(7));

    // The cart survives a reload
    let body: Value = ctx
        .client
        .get(ctx.url("/api/cart"))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("get cart failed")
        .json()
        .await
        .expect("cart body not json");
    assert_eq!(body["cart"][0]["quantity"].as_i64(), Some(7));
    assert_eq!(body["cart"][0]["title"].as_str(), Some(title.as_str()));
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_remove_is_idempotent() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;
    let title = unique_title("Removable");
    let product = ctx.create_product(&title, 5.00, 10).await;

    ctx.add_to_cart(&user, product, &title, 5.00, 1).await;

    for _ in 0..2 {
        let resp = ctx
            .client
            .delete(ctx.url(&format!("/api/cart/remove/{product}")))
            .bearer_auth(&user.token)
            .send()
            .await
            .expect("remove failed");
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = resp.json().await.expect("remove body not json");
        assert_eq!(body["cart"].as_array().map(Vec::len), Some(0));
    }
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_clear_cart() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;
    let title = unique_title("Clearable");
    let product = ctx.create_product(&title, 5.00, 10).await;

    ctx.add_to_cart(&user, product, &title, 5.00, 3).await;

    let resp = ctx
        .client
        .delete(ctx.url("/api/cart/clear"))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("clear failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("clear body not json");
    assert_eq!(body["message"].as_str(), Some("Cart cleared successfully"));

    // Clearing an already-empty cart is fine too
    let resp = ctx
        .client
        .delete(ctx.url("/api/cart/clear"))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("clear failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_quantity_bounds_enforced() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;
    let title = unique_title("Bounded");
    let product = ctx.create_product(&title, 5.00, 10).await;

    for quantity in [0, -1, 51] {
        let resp = ctx
            .client
            .post(ctx.url("/api/cart/add"))
            .bearer_auth(&user.token)
            .json(&serde_json::json!({
                "productId": product,
                "title": title,
                "price": 5.00,
                "quantity": quantity,
                "image": "https://example.com/test.png",
            }))
            .send()
            .await
            .expect("add failed");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "quantity {quantity}");
    }

    // 50 is the inclusive ceiling
    let body = ctx.add_to_cart(&user, product, &title, 5.00, 50).await;
    assert_eq!(body["cart"][0]["quantity"].as_i64(), Some(50));
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_add_with_missing_fields_is_plain_400() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;
    let title = unique_title("Partial");
    let product = ctx.create_product(&title, 5.00, 10).await;

    // No price field: must come back as our own 400 body, not a
    // deserialization 422.
    let resp = ctx
        .client
        .post(ctx.url("/api/cart/add"))
        .bearer_auth(&user.token)
        .json(&serde_json::json!({
            "productId": product,
            "title": title,
            "quantity": 2,
            "image": "https://example.com/test.png",
        }))
        .send()
        .await
        .expect("add failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("add body not json");
    assert_eq!(body["message"].as_str(), Some("All fields are required"));
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_cart_requires_token() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .expect("get cart failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = ctx
        .client
        .get(ctx.url("/api/cart"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .expect("get cart failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
