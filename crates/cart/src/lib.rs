//! Go Marketplace Cart - Persistent shopping cart store.
//!
//! Holds the user's cart in memory, mirrors it to local storage after every
//! change, and hands out [`CartHandle`]s so views can read the cart and call
//! `add_to_cart`, `increment` and `decrement`.
//!
//! # Example
//!
//! ```
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), go_marketplace_cart::CartError> {
//! use go_marketplace_cart::{CartProvider, KeyValueCartRepository, MemoryStore};
//! use go_marketplace_core::{NewCartItem, Price, ProductId};
//!
//! let provider = CartProvider::load(KeyValueCartRepository::new(MemoryStore::new())).await?;
//! let cart = provider.handle();
//!
//! cart.add_to_cart(NewCartItem {
//!     id: ProductId::from("p1"),
//!     title: "Shirt".to_string(),
//!     image_url: "https://cdn.example.com/shirt.png".to_string(),
//!     price: Price::from_cents(2000),
//! })
//! .await?;
//! cart.increment(&ProductId::from("p1")).await?;
//!
//! assert_eq!(cart.products()?.total_quantity(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`provider`] - `CartProvider` and `CartHandle`
//! - [`repository`] - Load/save of the whole cart
//! - [`storage`] - Key-value backends (file, memory)
//! - [`config`] - Environment configuration
//! - [`error`] - Error types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod provider;
pub mod repository;
pub mod storage;

pub use config::{CartConfig, ConfigError, CorruptCartPolicy};
pub use error::{CartError, Result};
pub use provider::{CartHandle, CartProvider};
pub use repository::{CartRepository, DEFAULT_CART_KEY, KeyValueCartRepository};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
