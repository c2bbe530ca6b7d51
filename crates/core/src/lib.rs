//! Cartify Core - Shared types library.
//!
//! This crate provides common types used across all Cartify components:
//! - `server` - REST backend (catalog, accounts, cart, orders, checkout)
//! - `cli` - Command-line tools for migrations, seeding, and the shopper client
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails, plus the cart
//!   line type and its mutation rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
