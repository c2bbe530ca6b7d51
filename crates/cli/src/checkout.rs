//! The two checkout flows.
//!
//! The legacy flow reproduces the client-orchestrated sequence: payment,
//! stock decrement, order creation, cart clear, each gated on the one before,
//! with no compensation when a later step fails. A payment can therefore be
//! captured and stock decremented without an order existing. The atomic flow
//! sends one idempotent server request instead.

use rust_decimal::Decimal;
use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

use cartify_core::{CartLine, CatalogAdd, cart_total, decide_catalog_add};

use crate::api::{ApiClient, ApiError, DecrementItem};
use crate::payment;

/// Advisory shown when the one-click add is already at its ceiling.
pub const LIMIT_MESSAGE: &str = "Maximum quantity reached for this item.";

/// Checkout flow errors.
#[derive(Debug, Error)]
pub enum CheckoutFlowError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("cart is empty, nothing to check out")]
    EmptyCart,

    /// A later step failed after earlier steps already committed.
    ///
    /// `payment_id` identifies the captured payment so it can be chased
    /// manually; the legacy sequence has no rollback.
    #[error("checkout failed after payment {payment_id} at step {step}: {source}")]
    Stranded {
        payment_id: String,
        step: &'static str,
        source: ApiError,
    },
}

/// What a completed checkout produced.
#[derive(Debug)]
pub struct PlacedOrder {
    pub payment_id: String,
    /// Amount captured by the payment step.
    pub amount_paid: Decimal,
    pub order: Value,
}

/// The legacy client-orchestrated checkout sequence.
///
/// # Errors
///
/// Returns [`CheckoutFlowError::Stranded`] when a step fails after payment
/// capture; earlier steps stay committed.
pub async fn legacy(client: &ApiClient) -> Result<PlacedOrder, CheckoutFlowError> {
    let cart = client.cart().await?;
    if cart.is_empty() {
        return Err(CheckoutFlowError::EmptyCart);
    }

    let total = cart_total(&cart);
    let receipt = payment::collect(total);

    let decrements: Vec<DecrementItem> = cart
        .iter()
        .map(|line| DecrementItem {
            id: line.product_id.as_i64(),
            quantity: line.quantity,
        })
        .collect();

    client
        .update_quantities(&decrements)
        .await
        .map_err(|e| stranded(&receipt.payment_id, "update-quantities", e))?;

    let items: Vec<Value> = cart
        .iter()
        .map(|line| json!({ "name": line.title, "quantity": line.quantity }))
        .collect();

    let response = client
        .create_order(&items, total)
        .await
        .map_err(|e| stranded(&receipt.payment_id, "create-order", e))?;

    client
        .clear_cart()
        .await
        .map_err(|e| stranded(&receipt.payment_id, "clear-cart", e))?;

    let order = response.get("order").cloned().unwrap_or(response);

    Ok(PlacedOrder {
        payment_id: receipt.payment_id,
        amount_paid: receipt.amount,
        order,
    })
}

/// The atomic server-side checkout.
///
/// The idempotency key is minted here, once per attempt; retrying with the
/// same key returns the original order.
///
/// # Errors
///
/// Returns [`CheckoutFlowError::Api`] on any server rejection; nothing is
/// mutated server-side in that case.
pub async fn atomic(client: &ApiClient) -> Result<PlacedOrder, CheckoutFlowError> {
    let cart = client.cart().await?;
    if cart.is_empty() {
        return Err(CheckoutFlowError::EmptyCart);
    }

    let receipt = payment::collect(cart_total(&cart));
    let idempotency_key = Uuid::new_v4();

    let response = client
        .checkout_atomic(idempotency_key, &receipt.payment_id)
        .await?;

    let order = response.get("order").cloned().unwrap_or(response);

    Ok(PlacedOrder {
        payment_id: receipt.payment_id,
        amount_paid: receipt.amount,
        order,
    })
}

/// One-click catalog add: +1 for an existing line, capped at the catalog
/// ceiling; a fresh line starts at 1.
///
/// Returns the updated cart, or `None` when the ceiling was hit and the cart
/// was left untouched.
///
/// # Errors
///
/// Returns [`CheckoutFlowError::Api`] if the catalog lookup or cart write
/// fails.
pub async fn catalog_add(
    client: &ApiClient,
    product_id: i64,
) -> Result<Option<Vec<CartLine>>, CheckoutFlowError> {
    let cart = client.cart().await?;

    let existing = cart
        .iter()
        .find(|line| line.product_id.as_i64() == product_id)
        .map(|line| line.quantity);

    match decide_catalog_add(existing) {
        CatalogAdd::LimitReached => Ok(None),
        CatalogAdd::Set(quantity) => {
            let line = match cart
                .into_iter()
                .find(|line| line.product_id.as_i64() == product_id)
            {
                // Existing line: resend the stored snapshot with the bumped
                // quantity.
                Some(mut line) => {
                    line.quantity = quantity;
                    line
                }
                // New line: snapshot the product from the catalog.
                None => snapshot_product(client, product_id, quantity).await?,
            };

            Ok(Some(client.add_line(&line).await?))
        }
    }
}

/// Build a fresh cart line from the catalog record.
async fn snapshot_product(
    client: &ApiClient,
    product_id: i64,
    quantity: i32,
) -> Result<CartLine, CheckoutFlowError> {
    // The single-product endpoint returns the full record; the line keeps
    // only the denormalized snapshot fields.
    let value = client.product(product_id).await?;

    let line = json!({
        "productId": product_id,
        "title": value.get("title").cloned().unwrap_or_default(),
        "price": value.get("price").cloned().unwrap_or_default(),
        "quantity": quantity,
        "image": value.get("image").cloned().unwrap_or_default(),
    });

    serde_json::from_value(line)
        .map_err(|e| CheckoutFlowError::Api(ApiError::UnexpectedShape(e.to_string())))
}

fn stranded(payment_id: &str, step: &'static str, source: ApiError) -> CheckoutFlowError {
    CheckoutFlowError::Stranded {
        payment_id: payment_id.to_owned(),
        step,
        source,
    }
}
