//! Order domain types and request validation.
//!
//! Orders are immutable fact records. Items deliberately carry only a name
//! and quantity (no product id), matching the wire contract; an order cannot
//! be reconciled against the catalog programmatically.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartify_core::{OrderId, UserId};

/// A single ordered item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: i32,
}

/// An immutable order record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub user_name: String,
    pub items: Vec<OrderItem>,
    pub bill_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Malformed-items failures, distinct from missing-field validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OrderItemsError {
    #[error("Items must be a non-empty array")]
    Empty,
    #[error("Each item must have a name and quantity")]
    MalformedItem,
}

/// Parse and validate the raw items array of an order request.
///
/// Each entry must be an object with a non-empty string `name` and a numeric
/// `quantity`. The array itself must be non-empty.
///
/// # Errors
///
/// Returns [`OrderItemsError::Empty`] for an empty array and
/// [`OrderItemsError::MalformedItem`] for any entry missing a name or a
/// numeric quantity.
pub fn parse_items(raw: &[serde_json::Value]) -> Result<Vec<OrderItem>, OrderItemsError> {
    if raw.is_empty() {
        return Err(OrderItemsError::Empty);
    }

    let mut items = Vec::with_capacity(raw.len());
    for value in raw {
        let name = value
            .get("name")
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty());
        let quantity = value
            .get("quantity")
            .and_then(serde_json::Value::as_i64)
            .and_then(|q| i32::try_from(q).ok());

        match (name, quantity) {
            (Some(name), Some(quantity)) => items.push(OrderItem {
                name: name.to_string(),
                quantity,
            }),
            _ => return Err(OrderItemsError::MalformedItem),
        }
    }

    Ok(items)
}
