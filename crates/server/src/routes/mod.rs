//! HTTP route handlers for the API server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database ping)
//!
//! # Products
//! GET    /api/products                  - Paginated catalog listing
//! GET    /api/products/{id}             - Single product
//! POST   /api/products                  - Create product
//! PUT    /api/products/{id}             - Partial update
//! DELETE /api/products/{id}             - Delete product
//! POST   /api/products/update-quantities - Legacy per-line stock decrement
//!
//! # Auth
//! POST /api/auth/register               - Create account, returns token
//! POST /api/auth/login                  - Login, returns token
//! POST /api/auth/change-password        - Rotate password
//!
//! # Admin
//! POST /api/admin/login                 - Admin login (built-in credentials)
//! GET  /api/admin/users                 - All accounts, passwords excluded (admin token)
//! GET  /api/admin/products              - Unpaginated catalog (admin token)
//!
//! # Cart (bearer token)
//! GET    /api/cart                      - Current cart
//! POST   /api/cart/add                  - Add or replace a line
//! DELETE /api/cart/remove/{productId}   - Remove a line
//! DELETE /api/cart/clear                - Empty the cart
//!
//! # Orders
//! POST /api/orders                      - Create order
//! GET  /api/orders/user/{userId}        - Orders for a user, newest first
//! GET  /api/orders/{orderId}            - Single order
//!
//! # Checkout
//! POST /api/checkout                    - Atomic idempotent checkout (bearer token)
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/update-quantities", post(products::update_quantities))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/change-password", post(auth::change_password))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/users", get(admin::users))
        .route("/products", get(admin::products))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove/{product_id}", delete(cart::remove))
        .route("/clear", delete(cart::clear))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create))
        .route("/user/{user_id}", get(orders::for_user))
        .route("/{order_id}", get(orders::show))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        // Credential endpoints get the strict limiter
        .nest("/api/auth", auth_routes().layer(auth_rate_limiter()))
        .nest("/api/admin", admin_routes().layer(auth_rate_limiter()))
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .route("/api/checkout", post(checkout::checkout))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
}
