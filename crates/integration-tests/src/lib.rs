//! Integration tests for Cartify.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, run migrations, start the server
//! cargo run -p cartify-cli -- migrate
//! cargo run -p cartify-server
//!
//! # Run the ignored integration tests
//! cargo test -p cartify-integration-tests -- --ignored
//! ```
//!
//! Every test is `#[ignore]`-gated so a plain `cargo test` passes without
//! infrastructure. Tests create their own users (unique emails) and products
//! and never assume a clean database.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// A registered test user with an active token.
pub struct TestUser {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// Shared context for driving the API.
pub struct TestContext {
    pub base_url: String,
    pub client: Client,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Create a context pointed at the configured server.
    #[must_use]
    pub fn new() -> Self {
        let base_url = std::env::var("CARTIFY_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Self {
            base_url,
            client: Client::new(),
        }
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Register a fresh user with a unique email.
    ///
    /// # Panics
    ///
    /// Panics if the server rejects the registration.
    pub async fn register_user(&self) -> TestUser {
        let suffix = Uuid::new_v4().simple().to_string();
        let email = format!("shopper-{suffix}@example.com");
        let name = format!("Shopper {suffix}");

        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": "integration-pass-1" }))
            .send()
            .await
            .expect("register request failed");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = resp.json().await.expect("register body not json");
        TestUser {
            token: body["token"].as_str().expect("token missing").to_string(),
            user_id: body["user"]["userId"]
                .as_str()
                .expect("userId missing")
                .to_string(),
            name,
            email,
        }
    }

    /// Create a catalog product and return its id.
    ///
    /// # Panics
    ///
    /// Panics if the server rejects the create.
    pub async fn create_product(&self, title: &str, price: f64, quantity: i32) -> i64 {
        let resp = self
            .client
            .post(self.url("/api/products"))
            .json(&json!({
                "title": title,
                "description": format!("{title} (integration test)"),
                "image": "https://example.com/test.png",
                "price": price,
                "quantity": quantity,
            }))
            .send()
            .await
            .expect("create product request failed");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: Value = resp.json().await.expect("create product body not json");
        body["product"]["id"].as_i64().expect("product id missing")
    }

    /// Fetch a product's current stock quantity.
    ///
    /// # Panics
    ///
    /// Panics if the product does not exist.
    pub async fn stock_of(&self, product_id: i64) -> i64 {
        let resp = self
            .client
            .get(self.url(&format!("/api/products/{product_id}")))
            .send()
            .await
            .expect("get product request failed");
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = resp.json().await.expect("product body not json");
        body["quantity"].as_i64().expect("quantity missing")
    }

    /// Put a line in a user's cart via the API.
    ///
    /// # Panics
    ///
    /// Panics if the server rejects the add.
    pub async fn add_to_cart(
        &self,
        user: &TestUser,
        product_id: i64,
        title: &str,
        price: f64,
        quantity: i32,
    ) -> Value {
        let resp = self
            .client
            .post(self.url("/api/cart/add"))
            .bearer_auth(&user.token)
            .json(&json!({
                "productId": product_id,
                "title": title,
                "price": price,
                "quantity": quantity,
                "image": "https://example.com/test.png",
            }))
            .send()
            .await
            .expect("cart add request failed");
        assert_eq!(resp.status(), StatusCode::OK);

        resp.json().await.expect("cart body not json")
    }
}
