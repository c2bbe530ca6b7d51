//! Cart line type and the pure mutation rules applied to a user's cart.
//!
//! A cart is an array of [`CartLine`]s embedded in the user record. Each line
//! is a denormalized snapshot of the product at the time it was added: the
//! title, price, and image are copied, not referenced, so they can drift from
//! the catalog afterwards. Checkout revalidates the snapshot against the
//! catalog before charging.
//!
//! Two quantity ceilings exist in the system and are deliberately kept
//! distinct:
//! - [`CART_LINE_MAX_QUANTITY`] (50) bounds any quantity a client may set on
//!   a line.
//! - [`CATALOG_ADD_CEILING`] (5) caps the one-click "add from catalog"
//!   increment path used by the shopper client.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// Lowest quantity a cart line may hold.
pub const CART_LINE_MIN_QUANTITY: i32 = 1;

/// Highest quantity a cart line may hold.
pub const CART_LINE_MAX_QUANTITY: i32 = 50;

/// Ceiling for the one-click "add from catalog" increment path.
pub const CATALOG_ADD_CEILING: i32 = 5;

/// One product entry inside a user's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog id of the product this line refers to.
    pub product_id: ProductId,
    /// Product title at the time the line was added.
    pub title: String,
    /// Unit price at the time the line was added.
    pub price: Decimal,
    /// Quantity of this product in the cart.
    pub quantity: i32,
    /// Product image URL at the time the line was added.
    pub image: String,
}

/// Add a line to the cart, or replace the quantity of an existing line.
///
/// If a line with the same product id already exists, its quantity is set to
/// the incoming value (the snapshot fields are refreshed too). Otherwise the
/// line is appended. The cart never holds two lines for the same product.
pub fn add_or_set_line(cart: &mut Vec<CartLine>, line: CartLine) {
    match cart.iter_mut().find(|l| l.product_id == line.product_id) {
        Some(existing) => *existing = line,
        None => cart.push(line),
    }
}

/// Remove the line for `product_id` from the cart.
///
/// Removing an absent line is a no-op. Returns `true` if a line was removed.
pub fn remove_line(cart: &mut Vec<CartLine>, product_id: ProductId) -> bool {
    let before = cart.len();
    cart.retain(|l| l.product_id != product_id);
    cart.len() != before
}

/// Sum of `price * quantity` across all lines.
#[must_use]
pub fn cart_total(cart: &[CartLine]) -> Decimal {
    cart.iter()
        .map(|l| l.price * Decimal::from(l.quantity))
        .sum()
}

/// Total number of items (sum of quantities) in the cart.
#[must_use]
pub fn cart_item_count(cart: &[CartLine]) -> i64 {
    cart.iter().map(|l| i64::from(l.quantity)).sum()
}

/// Outcome of the "add to cart from catalog" convenience path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAdd {
    /// Set the line to this quantity.
    Set(i32),
    /// The line is already at [`CATALOG_ADD_CEILING`]; leave the cart
    /// unchanged and surface an advisory message.
    LimitReached,
}

/// Decide what the one-click catalog add should do given the quantity the
/// cart currently holds for the product (`None` when the product is not in
/// the cart yet).
#[must_use]
pub fn decide_catalog_add(existing_quantity: Option<i32>) -> CatalogAdd {
    match existing_quantity {
        None => CatalogAdd::Set(1),
        Some(q) if q < CATALOG_ADD_CEILING => CatalogAdd::Set(q + 1),
        Some(_) => CatalogAdd::LimitReached,
    }
}
