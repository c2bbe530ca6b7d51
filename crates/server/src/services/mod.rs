//! Business services on top of the repository layer.

pub mod auth;
pub mod checkout;
pub mod token;
