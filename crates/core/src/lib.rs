//! Go Marketplace Core - Shared cart types.
//!
//! This crate provides the types used across the Go Marketplace components:
//! - `cart` - Persistent cart store with provider/handle access
//! - `cli` - Command-line driver for inspecting and editing a stored cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure transformations - no I/O, no
//! storage access, no async runtime. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, quantities, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
