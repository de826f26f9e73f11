//! Core types for Go Marketplace.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod quantity;

pub use cart::{Cart, CartItem, NewCartItem};
pub use id::ProductId;
pub use price::Price;
pub use quantity::{Quantity, QuantityError};
