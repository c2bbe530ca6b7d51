//! Shared type definitions.

pub mod cart;
pub mod email;
pub mod id;

pub use cart::{
    CART_LINE_MAX_QUANTITY, CART_LINE_MIN_QUANTITY, CATALOG_ADD_CEILING, CartLine, CatalogAdd,
    add_or_set_line, cart_item_count, cart_total, decide_catalog_add, remove_line,
};
pub use email::{Email, EmailError};
pub use id::{OrderId, ProductId, UserId};
