//! Catalog product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartify_core::ProductId;

/// A catalog product.
///
/// `quantity` is the remaining stock, mutated by the checkout decrement.
/// Listings do not filter on `is_active`; callers see inactive products too
/// (kept from the observed behavior of the original system).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: i32,
    pub is_active: bool,
    pub rating: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Fields required to create a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub rating: Decimal,
}

const fn default_active() -> bool {
    true
}

/// Partial update for a product. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub is_active: Option<bool>,
    pub rating: Option<Decimal>,
}

/// Field-level validation failures for product writes.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProductValidationError {
    #[error("price must not be negative")]
    NegativePrice,
    #[error("quantity must not be negative")]
    NegativeQuantity,
    #[error("rating must be between 0 and 5")]
    RatingOutOfRange,
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

impl NewProduct {
    /// Validate field constraints before insert.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.title.trim().is_empty() {
            return Err(ProductValidationError::EmptyField("title"));
        }
        if self.description.trim().is_empty() {
            return Err(ProductValidationError::EmptyField("description"));
        }
        if self.image.trim().is_empty() {
            return Err(ProductValidationError::EmptyField("image"));
        }
        validate_ranges(Some(self.price), Some(self.quantity), Some(self.rating))
    }
}

impl ProductPatch {
    /// Validate the fields present in the patch.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err(ProductValidationError::EmptyField("title"));
        }
        validate_ranges(self.price, self.quantity, self.rating)
    }

    /// Whether the patch carries no fields at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.is_active.is_none()
            && self.rating.is_none()
    }
}

fn validate_ranges(
    price: Option<Decimal>,
    quantity: Option<i32>,
    rating: Option<Decimal>,
) -> Result<(), ProductValidationError> {
    if price.is_some_and(|p| p < Decimal::ZERO) {
        return Err(ProductValidationError::NegativePrice);
    }
    if quantity.is_some_and(|q| q < 0) {
        return Err(ProductValidationError::NegativeQuantity);
    }
    if rating.is_some_and(|r| r < Decimal::ZERO || r > Decimal::from(5)) {
        return Err(ProductValidationError::RatingOutOfRange);
    }
    Ok(())
}
