//! Cart route handlers.
//!
//! The cart is an embedded array on the user row; every operation loads it,
//! applies a pure mutation from `cartify_core`, and writes it back. A missing
//! user row is a 404 on every endpoint.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use cartify_core::{
    CART_LINE_MAX_QUANTITY, CART_LINE_MIN_QUANTITY, CartLine, ProductId, UserId, add_or_set_line,
    remove_line,
};

use crate::db::users::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Add-to-cart request: a full denormalized line snapshot.
///
/// All fields are `Option` so a missing one yields our own 400 body rather
/// than the framework's deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartBody {
    pub product_id: Option<i64>,
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub image: Option<String>,
}

/// `GET /api/cart`.
#[instrument(skip(state))]
pub async fn show(
    RequireUser(user_id): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let cart = load_cart(&state, &user_id).await?;
    Ok(Json(json!({ "cart": cart })))
}

/// `POST /api/cart/add` — replace the quantity when the product is already
/// in the cart, append the line otherwise.
#[instrument(skip(state, body))]
pub async fn add(
    RequireUser(user_id): RequireUser,
    State(state): State<AppState>,
    Json(body): Json<AddToCartBody>,
) -> Result<Json<serde_json::Value>> {
    let (Some(product_id), Some(title), Some(price), Some(quantity), Some(image)) =
        (body.product_id, body.title, body.price, body.quantity, body.image)
    else {
        return Err(AppError::BadRequest("All fields are required".to_owned()));
    };

    if !(CART_LINE_MIN_QUANTITY..=CART_LINE_MAX_QUANTITY).contains(&quantity) {
        return Err(AppError::BadRequest(format!(
            "Quantity must be between {CART_LINE_MIN_QUANTITY} and {CART_LINE_MAX_QUANTITY}"
        )));
    }

    let mut cart = load_cart(&state, &user_id).await?;

    let line = CartLine {
        product_id: ProductId::new(product_id),
        title,
        price,
        quantity,
        image,
    };
    add_or_set_line(&mut cart, line);

    let repo = UserRepository::new(state.pool());
    repo.save_cart(&user_id, &cart).await?;

    Ok(Json(json!({ "cart": cart })))
}

/// `DELETE /api/cart/remove/{productId}` — idempotent.
#[instrument(skip(state))]
pub async fn remove(
    RequireUser(user_id): RequireUser,
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let mut cart = load_cart(&state, &user_id).await?;

    remove_line(&mut cart, ProductId::new(product_id));

    let repo = UserRepository::new(state.pool());
    repo.save_cart(&user_id, &cart).await?;

    Ok(Json(json!({ "cart": cart })))
}

/// `DELETE /api/cart/clear` — idempotent.
#[instrument(skip(state))]
pub async fn clear(
    RequireUser(user_id): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    // Load first so a vanished user is still a 404, not a silent no-op.
    let _ = load_cart(&state, &user_id).await?;

    let repo = UserRepository::new(state.pool());
    repo.save_cart(&user_id, &[]).await?;

    Ok(Json(json!({ "message": "Cart cleared successfully" })))
}

/// Fetch the cart for a user, mapping a missing row to the legacy 404.
async fn load_cart(state: &AppState, user_id: &UserId) -> Result<Vec<CartLine>> {
    let repo = UserRepository::new(state.pool());

    repo.get_cart(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))
}
