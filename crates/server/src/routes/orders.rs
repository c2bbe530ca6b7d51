//! Order route handlers.
//!
//! Order endpoints keep the legacy envelope: `success` plus either the
//! payload or a message. Missing required fields are reported separately
//! from a malformed items array.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use cartify_core::{OrderId, UserId};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::order::{Order, parse_items};
use crate::state::AppState;

/// Create-order request. All fields optional so presence is checked by hand,
/// and `items` is raw JSON so malformed entries get the distinct 400.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub items: Option<Vec<serde_json::Value>>,
    pub bill_amount: Option<Decimal>,
}

/// A 400 in the order envelope shape.
fn order_failure(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}

/// `POST /api/orders` — validate and persist an immutable order record.
///
/// Nothing is persisted on validation failure. The order id is minted from
/// the current timestamp (`ORD{millis}`).
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderBody>,
) -> Result<Response> {
    let (Some(user_id), Some(user_name), Some(items), Some(bill_amount)) =
        (body.user_id, body.user_name, body.items, body.bill_amount)
    else {
        return Ok(order_failure("Missing required fields"));
    };

    let items = match parse_items(&items) {
        Ok(items) => items,
        Err(e) => return Ok(order_failure(&e.to_string())),
    };

    let order = Order {
        order_id: OrderId::mint(),
        user_id: UserId::new(user_id),
        user_name,
        items,
        bill_amount,
        created_at: Utc::now(),
    };

    let repo = OrderRepository::new(state.pool());
    repo.create(&order).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "order": order })),
    )
        .into_response())
}

/// `GET /api/orders/user/{userId}` — newest first.
#[instrument(skip(state))]
pub async fn for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let repo = OrderRepository::new(state.pool());
    let orders = repo.for_user(&UserId::new(user_id)).await?;

    Ok(Json(json!({ "success": true, "orders": orders })))
}

/// `GET /api/orders/{orderId}`.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let repo = OrderRepository::new(state.pool());

    let order = repo
        .get(&OrderId::new(order_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    Ok(Json(json!({ "success": true, "order": order })))
}
