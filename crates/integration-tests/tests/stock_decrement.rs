//! Integration tests for the legacy stock decrement batch.
//!
//! The legacy contract is deliberately non-atomic: the batch stops at the
//! first failing line and earlier lines stay decremented. These tests pin
//! that behavior down so nobody "fixes" it by accident; the atomic
//! alternative is covered in `checkout.rs`.
//!
//! Run with: cargo test -p cartify-integration-tests -- --ignored

use cartify_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

fn unique_title(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_full_batch_decrements_all_lines() {
    let ctx = TestContext::new();

    let p1 = ctx.create_product(&unique_title("Batch A"), 10.0, 8).await;
    let p2 = ctx.create_product(&unique_title("Batch B"), 12.0, 4).await;

    let resp = ctx
        .client
        .post(ctx.url("/api/products/update-quantities"))
        .json(&json!({ "items": [
            { "id": p1, "quantity": 3 },
            { "id": p2, "quantity": 4 },
        ]}))
        .send()
        .await
        .expect("decrement failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("body not json");
    assert_eq!(
        body["message"].as_str(),
        Some("Product quantities updated successfully")
    );

    assert_eq!(ctx.stock_of(p1).await, 5);
    assert_eq!(ctx.stock_of(p2).await, 0);
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_batch_stops_at_first_insufficient_line() {
    let ctx = TestContext::new();

    let title_b = unique_title("Scarce B");
    let p1 = ctx.create_product(&unique_title("Plenty A"), 10.0, 5).await;
    let p2 = ctx.create_product(&title_b, 12.0, 1).await;

    let resp = ctx
        .client
        .post(ctx.url("/api/products/update-quantities"))
        .json(&json!({ "items": [
            { "id": p1, "quantity": 3 },
            { "id": p2, "quantity": 2 },
        ]}))
        .send()
        .await
        .expect("decrement failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("body not json");
    assert_eq!(
        body["message"].as_str(),
        Some(format!("Insufficient quantity for product {title_b}").as_str())
    );

    // The failing line is untouched, but the earlier line stays decremented.
    assert_eq!(ctx.stock_of(p1).await, 2);
    assert_eq!(ctx.stock_of(p2).await, 1);
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_batch_fails_on_unknown_product() {
    let ctx = TestContext::new();
    let p1 = ctx.create_product(&unique_title("Known"), 10.0, 5).await;

    let resp = ctx
        .client
        .post(ctx.url("/api/products/update-quantities"))
        .json(&json!({ "items": [
            { "id": p1, "quantity": 1 },
            { "id": 999_999_999, "quantity": 1 },
        ]}))
        .send()
        .await
        .expect("decrement failed");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.expect("body not json");
    assert_eq!(
        body["message"].as_str(),
        Some("Product with id 999999999 not found")
    );

    // First line still went through.
    assert_eq!(ctx.stock_of(p1).await, 4);
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_batch_rejects_missing_items() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .post(ctx.url("/api/products/update-quantities"))
        .json(&json!({ "something": "else" }))
        .send()
        .await
        .expect("decrement failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("body not json");
    assert_eq!(body["message"].as_str(), Some("Invalid request format"));
}
