//! Cart persistence.
//!
//! [`CartRepository`] is the narrow interface the store talks to: load the
//! whole cart, save the whole cart. [`KeyValueCartRepository`] implements it
//! as a JSON array under a single key of a [`KeyValueStore`].

use async_trait::async_trait;
use tracing::instrument;

use go_marketplace_core::Cart;

use crate::error::{CartError, Result};
use crate::storage::{KeyValueStore, StorageError};

/// Storage key used when none is configured.
pub const DEFAULT_CART_KEY: &str = "@cart";

/// Load/save access to the persisted cart.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Read the persisted cart. An absent cart is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the backend cannot be read.
    /// Returns `CartError::Corrupt` if the stored value is not valid text or
    /// does not decode.
    async fn load(&self) -> Result<Cart>;

    /// Replace the persisted cart with `cart`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the backend cannot be written.
    async fn save(&self, cart: &Cart) -> Result<()>;
}

/// Cart repository over a key-value store.
#[derive(Debug)]
pub struct KeyValueCartRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KeyValueCartRepository<S> {
    /// Create a repository using the default `@cart` key.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_CART_KEY)
    }

    /// Create a repository storing the cart under `key`.
    #[must_use]
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The key the cart is stored under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: KeyValueStore> CartRepository for KeyValueCartRepository<S> {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Cart> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "No stored cart");
                return Ok(Cart::new());
            }
            Err(StorageError::InvalidData(reason)) => return Err(CartError::Corrupt(reason)),
            Err(e) => return Err(e.into()),
        };

        let cart: Cart =
            serde_json::from_str(&raw).map_err(|e| CartError::Corrupt(e.to_string()))?;
        tracing::debug!(key = %self.key, items = cart.len(), "Loaded stored cart");
        Ok(cart)
    }

    #[instrument(skip(self, cart), fields(items = cart.len()))]
    async fn save(&self, cart: &Cart) -> Result<()> {
        let raw = serde_json::to_string(cart).map_err(CartError::Serialize)?;
        self.store.set(&self.key, &raw).await?;
        Ok(())
    }
}
