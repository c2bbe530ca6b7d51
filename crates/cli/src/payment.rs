//! Payment capture stand-in.
//!
//! The production flow hands the shopper to a hosted payment page and gets
//! back an opaque payment reference. The CLI has no browser, so this module
//! plays the provider's part: it "collects" the amount and mints a reference
//! in the same shape the rest of the flow expects.

use rust_decimal::Decimal;
use uuid::Uuid;

/// The provider's answer to a capture attempt.
#[derive(Debug)]
pub struct PaymentReceipt {
    /// Opaque provider reference, passed through to the order flow.
    pub payment_id: String,
    /// Amount captured.
    pub amount: Decimal,
}

/// Capture a payment for the given amount.
#[must_use]
pub fn collect(amount: Decimal) -> PaymentReceipt {
    let payment_id = format!("pay_{}", Uuid::new_v4().simple());

    tracing::info!(%payment_id, %amount, "payment captured");

    PaymentReceipt { payment_id, amount }
}
