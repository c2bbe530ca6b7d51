//! Integration tests for the order endpoints.
//!
//! Run with: cargo test -p cartify-integration-tests -- --ignored

use cartify_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_create_order_and_fetch() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;

    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&json!({
            "userId": user.user_id,
            "userName": user.name,
            "items": [
                { "name": "Widget", "quantity": 2 },
                { "name": "Gadget", "quantity": 1 },
            ],
            "billAmount": 34.97,
        }))
        .send()
        .await
        .expect("create order failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("body not json");
    assert_eq!(body["success"].as_bool(), Some(true));
    let order_id = body["order"]["orderId"].as_str().expect("orderId");
    assert!(order_id.starts_with("ORD"));

    // Fetch by id
    let body: Value = ctx
        .client
        .get(ctx.url(&format!("/api/orders/{order_id}")))
        .send()
        .await
        .expect("get order failed")
        .json()
        .await
        .expect("order body not json");
    assert_eq!(body["success"].as_bool(), Some(true));
    assert_eq!(body["order"]["userId"].as_str(), Some(user.user_id.as_str()));
    assert_eq!(
        body["order"]["items"].as_array().map(Vec::len),
        Some(2)
    );
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_orders_for_user_newest_first() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;

    let mut ids = Vec::new();
    for i in 0..3 {
        let resp = ctx
            .client
            .post(ctx.url("/api/orders"))
            .json(&json!({
                "userId": user.user_id,
                "userName": user.name,
                "items": [{ "name": format!("Item {i}"), "quantity": 1 }],
                "billAmount": 10.00,
            }))
            .send()
            .await
            .expect("create order failed");
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = resp.json().await.expect("body not json");
        ids.push(body["order"]["orderId"].as_str().expect("orderId").to_string());
        // Order ids derive from a millisecond clock; keep them distinct.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let body: Value = ctx
        .client
        .get(ctx.url(&format!("/api/orders/user/{}", user.user_id)))
        .send()
        .await
        .expect("list orders failed")
        .json()
        .await
        .expect("orders body not json");
    assert_eq!(body["success"].as_bool(), Some(true));

    let orders = body["orders"].as_array().expect("orders array");
    assert_eq!(orders.len(), 3);

    let listed: Vec<&str> = orders
        .iter()
        .map(|o| o["orderId"].as_str().expect("orderId"))
        .collect();
    ids.reverse();
    assert_eq!(listed, ids);
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_create_order_validation() {
    let ctx = TestContext::new();
    let user = ctx.register_user().await;

    // Missing userName
    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&json!({
            "userId": user.user_id,
            "items": [{ "name": "Widget", "quantity": 1 }],
            "billAmount": 10.00,
        }))
        .send()
        .await
        .expect("create order failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("body not json");
    assert_eq!(body["success"].as_bool(), Some(false));
    assert_eq!(body["message"].as_str(), Some("Missing required fields"));

    // Empty items array
    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&json!({
            "userId": user.user_id,
            "userName": user.name,
            "items": [],
            "billAmount": 10.00,
        }))
        .send()
        .await
        .expect("create order failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("body not json");
    assert_eq!(body["success"].as_bool(), Some(false));
    assert_eq!(
        body["message"].as_str(),
        Some("Items must be a non-empty array")
    );

    // Item missing a quantity
    let resp = ctx
        .client
        .post(ctx.url("/api/orders"))
        .json(&json!({
            "userId": user.user_id,
            "userName": user.name,
            "items": [{ "name": "Widget" }],
            "billAmount": 10.00,
        }))
        .send()
        .await
        .expect("create order failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("body not json");
    assert_eq!(body["success"].as_bool(), Some(false));
    assert_eq!(
        body["message"].as_str(),
        Some("Each item must have a name and quantity")
    );
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_unknown_order_is_404() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .get(ctx.url("/api/orders/ORD0000000000000"))
        .send()
        .await
        .expect("get order failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("body not json");
    assert_eq!(body["message"].as_str(), Some("Order not found"));
}
