//! Domain types for the server.
//!
//! These types represent validated domain objects separate from database row
//! types; the `db` modules map rows into them.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderItem, OrderItemsError};
pub use product::{NewProduct, Product, ProductPatch, ProductValidationError};
pub use user::{AdminUserView, PublicUser, User};
