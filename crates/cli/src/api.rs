//! HTTP client for the Cartify API.
//!
//! Thin typed wrapper over `reqwest`; every call returns the server's JSON
//! payload or an [`ApiError::Server`] carrying the server's `message`.

use reqwest::{Method, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

use cartify_core::CartLine;

use crate::session::{Session, SessionError};

/// Default server address when `CARTIFY_API_URL` is unset.
const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Session(#[from] SessionError),

    /// The server answered with an error status and a message body.
    #[error("server said ({status}): {message}")]
    Server { status: StatusCode, message: String },

    /// The server answered 2xx but the body was not the expected shape.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

/// Auth response payload.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

/// The user object inside an auth response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

/// One line of a stock decrement batch.
#[derive(Debug, serde::Serialize)]
pub struct DecrementItem {
    pub id: i64,
    pub quantity: i32,
}

/// Cartify API client bound to a session.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    pub session: Session,
}

impl ApiClient {
    /// Create a client for the configured server.
    #[must_use]
    pub fn new(session: Session) -> Self {
        let base_url = std::env::var("CARTIFY_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_owned());

        Self {
            base_url,
            http: reqwest::Client::new(),
            session,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{path}", self.base_url))
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.session.require_token()?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    /// Send and unwrap the response, surfacing the server's `message` on
    /// error statuses.
    async fn send(builder: RequestBuilder) -> Result<Value, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            return Ok(body);
        }

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_owned();

        Err(ApiError::Server { status, message })
    }

    /// `POST /api/auth/register`, storing the new session on success.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let body = json!({ "name": name, "email": email, "password": password });
        let value = Self::send(
            self.request(Method::POST, "/api/auth/register")
                .json(&body),
        )
        .await?;

        self.adopt_auth(value)
    }

    /// `POST /api/auth/login`, storing the new session on success.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = json!({ "email": email, "password": password });
        let value =
            Self::send(self.request(Method::POST, "/api/auth/login").json(&body)).await?;

        self.adopt_auth(value)
    }

    fn adopt_auth(&mut self, value: Value) -> Result<AuthResponse, ApiError> {
        let auth: AuthResponse =
            serde_json::from_value(value).map_err(|e| ApiError::UnexpectedShape(e.to_string()))?;

        self.session.token = Some(auth.token.clone());
        self.session.user_id = Some(auth.user.user_id.clone());
        self.session.user_name = Some(auth.user.name.clone());
        self.session.save()?;

        Ok(auth)
    }

    /// `GET /api/products` (paginated).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn products(&self, page: i64, limit: i64) -> Result<Value, ApiError> {
        Self::send(
            self.request(Method::GET, "/api/products")
                .query(&[("page", page), ("limit", limit)]),
        )
        .await
    }

    /// `GET /api/products/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn product(&self, id: i64) -> Result<Value, ApiError> {
        Self::send(self.request(Method::GET, &format!("/api/products/{id}"))).await
    }

    /// `GET /api/cart`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn cart(&self) -> Result<Vec<CartLine>, ApiError> {
        let value = Self::send(self.authed(Method::GET, "/api/cart")?).await?;
        parse_cart(value)
    }

    /// `POST /api/cart/add` with a full line snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn add_line(&self, line: &CartLine) -> Result<Vec<CartLine>, ApiError> {
        let value = Self::send(self.authed(Method::POST, "/api/cart/add")?.json(line)).await?;
        parse_cart(value)
    }

    /// `DELETE /api/cart/remove/{productId}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn remove_line(&self, product_id: i64) -> Result<Vec<CartLine>, ApiError> {
        let value = Self::send(
            self.authed(Method::DELETE, &format!("/api/cart/remove/{product_id}"))?,
        )
        .await?;
        parse_cart(value)
    }

    /// `DELETE /api/cart/clear`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        Self::send(self.authed(Method::DELETE, "/api/cart/clear")?).await?;
        Ok(())
    }

    /// `POST /api/products/update-quantities` (legacy decrement).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn update_quantities(&self, items: &[DecrementItem]) -> Result<(), ApiError> {
        let body = json!({ "items": items });
        Self::send(
            self.request(Method::POST, "/api/products/update-quantities")
                .json(&body),
        )
        .await?;
        Ok(())
    }

    /// `POST /api/orders`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn create_order(
        &self,
        items: &[Value],
        bill_amount: Decimal,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "userId": self.session.require_user_id()?,
            "userName": self.session.user_name.as_deref().unwrap_or_default(),
            "items": items,
            "billAmount": bill_amount,
        });
        Self::send(self.request(Method::POST, "/api/orders").json(&body)).await
    }

    /// `GET /api/orders/user/{userId}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn orders(&self) -> Result<Value, ApiError> {
        let user_id = self.session.require_user_id()?;
        Self::send(self.request(Method::GET, &format!("/api/orders/user/{user_id}"))).await
    }

    /// `POST /api/checkout` (atomic, idempotent).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` on any non-2xx response.
    pub async fn checkout_atomic(
        &self,
        idempotency_key: Uuid,
        payment_id: &str,
    ) -> Result<Value, ApiError> {
        let body = json!({
            "idempotencyKey": idempotency_key,
            "paymentId": payment_id,
        });
        Self::send(self.authed(Method::POST, "/api/checkout")?.json(&body)).await
    }
}

/// Unwrap a `{"cart": [...]}` payload.
fn parse_cart(value: Value) -> Result<Vec<CartLine>, ApiError> {
    let cart = value
        .get("cart")
        .cloned()
        .ok_or_else(|| ApiError::UnexpectedShape("missing cart field".to_owned()))?;

    serde_json::from_value(cart).map_err(|e| ApiError::UnexpectedShape(e.to_string()))
}
