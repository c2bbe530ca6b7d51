//! Integration tests for the catalog endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p cartify-server)
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
async fn test_pagination_covers_whole_catalog() {
    let ctx = TestContext::new();

    // 25 extra products; the catalog may already hold others.
    let prefix = unique_title("Paging");
    for i in 0..25 {
        ctx.create_product(&format!("{prefix} #{i}"), 9.99, 5).await;
    }

    let limit = 12;
    let first: Value = ctx
        .client
        .get(ctx.url("/api/products"))
        .query(&[("page", 1), ("limit", limit)])
        .send()
        .await
        .expect("list request failed")
        .json()
        .await
        .expect("list body not json");

    let total = first["totalProducts"].as_i64().expect("totalProducts");
    let total_pages = first["totalPages"].as_i64().expect("totalPages");
    assert!(total >= 25);
    // ceil(total / limit)
    assert_eq!(total_pages, (total + limit - 1) / limit);
    assert_eq!(first["currentPage"].as_i64(), Some(1));

    // Walk every page: sizes bounded by limit, ids strictly ascending,
    // every created product seen exactly once.
    let mut seen = 0_i64;
    let mut created_seen = 0;
    let mut last_id = 0_i64;
    for page in 1..=total_pages {
        let body: Value = ctx
            .client
            .get(ctx.url("/api/products"))
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await
            .expect("page request failed")
            .json()
            .await
            .expect("page body not json");

        let products = body["products"].as_array().expect("products array");
        assert!(products.len() as i64 <= limit);

        for product in products {
            let id = product["id"].as_i64().expect("id");
            assert!(id > last_id, "listing must be in ascending id order");
            last_id = id;

            if product["title"].as_str().is_some_and(|t| t.starts_with(&prefix)) {
                created_seen += 1;
            }
        }
        seen += products.len() as i64;
    }

    assert_eq!(seen, total);
    assert_eq!(created_seen, 25);
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_product_crud_lifecycle() {
    let ctx = TestContext::new();

    let title = unique_title("Lifecycle");
    let id = ctx.create_product(&title, 19.50, 7).await;

    // Read it back
    let product: Value = ctx
        .client
        .get(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .expect("get failed")
        .json()
        .await
        .expect("get body not json");
    assert_eq!(product["title"].as_str(), Some(title.as_str()));
    assert_eq!(product["quantity"].as_i64(), Some(7));

    // Partial update leaves other fields alone
    let resp = ctx
        .client
        .put(ctx.url(&format!("/api/products/{id}")))
        .json(&json!({ "price": 21.00 }))
        .send()
        .await
        .expect("update failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("update body not json");
    assert_eq!(body["message"].as_str(), Some("Product updated"));
    assert_eq!(body["product"]["title"].as_str(), Some(title.as_str()));

    // Delete returns the deleted record
    let resp = ctx
        .client
        .delete(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .expect("delete failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("delete body not json");
    assert_eq!(body["message"].as_str(), Some("Product deleted"));

    // Gone now
    let resp = ctx
        .client
        .get(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .expect("get after delete failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_create_rejects_missing_fields() {
    let ctx = TestContext::new();

    let resp = ctx
        .client
        .post(ctx.url("/api/products"))
        .json(&json!({ "title": "Only a title" }))
        .send()
        .await
        .expect("create failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("body not json");
    assert_eq!(body["message"].as_str(), Some("All fields are required"));
}

#[tokio::test]
#[ignore = "requires running cartify-server and PostgreSQL"]
async fn test_update_validates_ranges() {
    let ctx = TestContext::new();
    let id = ctx.create_product(&unique_title("Ranges"), 5.00, 3).await;

    let resp = ctx
        .client
        .put(ctx.url(&format!("/api/products/{id}")))
        .json(&json!({ "rating": 9 }))
        .send()
        .await
        .expect("update failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Unknown id is a 404, not a validation error
    let resp = ctx
        .client
        .put(ctx.url("/api/products/999999999"))
        .json(&json!({ "price": 1.00 }))
        .send()
        .await
        .expect("update failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
