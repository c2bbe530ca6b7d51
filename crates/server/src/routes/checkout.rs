//! Atomic checkout route handler.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

/// Checkout request.
///
/// The client generates the idempotency key once per checkout attempt and
/// reuses it on retries; `paymentId` is the opaque reference handed back by
/// the payment provider.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub idempotency_key: Uuid,
    pub payment_id: String,
}

/// `POST /api/checkout`.
///
/// 201 with the order on first commit; 200 with the original order when the
/// key has already been used.
#[instrument(skip(state, body), fields(user_id = %user_id))]
pub async fn checkout(
    RequireUser(user_id): RequireUser,
    State(state): State<AppState>,
    Json(body): Json<CheckoutBody>,
) -> Result<impl IntoResponse> {
    let service = CheckoutService::new(state.pool());

    let outcome = service
        .place_order(&user_id, body.idempotency_key, &body.payment_id)
        .await?;

    let status = if outcome.replayed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(json!({
            "success": true,
            "order": outcome.order,
            "replayed": outcome.replayed,
        })),
    ))
}
