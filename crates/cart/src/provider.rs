//! Cart provider and the handles consumers use to reach it.
//!
//! A [`CartProvider`] owns the cart for as long as it is alive: it loads the
//! persisted cart once, holds the in-memory copy, and writes the whole cart
//! back after every change. Consumers never get the provider itself; they get
//! a [`CartHandle`], which can only be taken from a live provider.
//!
//! Once the provider is dropped its scope is over and every handle call fails
//! with [`CartError::OutsideProvider`].
//!
//! The in-memory cart is the source of truth. Each operation updates it,
//! publishes it to subscribers, then saves it. A failed save is logged and
//! returned, but the in-memory update stands.

use std::sync::{Arc, Weak};

use tokio::sync::{Mutex, watch};
use tracing::instrument;

use go_marketplace_core::{Cart, NewCartItem, ProductId};

use crate::config::{CartConfig, CorruptCartPolicy};
use crate::error::{CartError, Result};
use crate::repository::{CartRepository, KeyValueCartRepository};
use crate::storage::FileStore;

/// Owner of the shared cart state.
///
/// Not `Clone`: there is one provider per cart, and its lifetime is the scope
/// in which handles work.
pub struct CartProvider {
    shared: Arc<Shared>,
}

struct Shared {
    repository: Arc<dyn CartRepository>,
    products: watch::Sender<Cart>,
    // Serializes mutate-then-save so writes land in the order of updates.
    write_lock: Mutex<()>,
}

impl CartProvider {
    /// Load the persisted cart and start a provider around it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the cart cannot be read and
    /// `CartError::Corrupt` if the stored cart does not decode.
    pub async fn load(repository: impl CartRepository + 'static) -> Result<Self> {
        Self::load_with_policy(repository, CorruptCartPolicy::Fail).await
    }

    /// Load the persisted cart, handling an undecodable cart per `policy`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the cart cannot be read, and
    /// `CartError::Corrupt` if it does not decode under
    /// [`CorruptCartPolicy::Fail`].
    #[instrument(skip(repository))]
    pub async fn load_with_policy(
        repository: impl CartRepository + 'static,
        policy: CorruptCartPolicy,
    ) -> Result<Self> {
        let cart = match repository.load().await {
            Ok(cart) => cart,
            Err(CartError::Corrupt(e)) if policy == CorruptCartPolicy::Reset => {
                tracing::warn!(error = %e, "Stored cart is corrupt, starting with an empty cart");
                Cart::new()
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            items = cart.len(),
            units = cart.total_quantity(),
            "Cart loaded"
        );
        Ok(Self::with_cart(repository, cart))
    }

    /// Load a file-backed cart as described by `config`.
    ///
    /// # Errors
    ///
    /// Same as [`CartProvider::load_with_policy`].
    pub async fn from_config(config: &CartConfig) -> Result<Self> {
        let store = FileStore::new(&config.storage_dir);
        let repository = KeyValueCartRepository::with_key(store, config.storage_key.clone());
        Self::load_with_policy(repository, config.on_corrupt).await
    }

    /// Start a provider around an already loaded cart, without reading storage.
    #[must_use]
    pub fn with_cart(repository: impl CartRepository + 'static, cart: Cart) -> Self {
        let (products, _) = watch::channel(cart);
        Self {
            shared: Arc::new(Shared {
                repository: Arc::new(repository),
                products,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Get a handle for a consumer.
    #[must_use]
    pub fn handle(&self) -> CartHandle {
        CartHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }
}

impl std::fmt::Debug for CartProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartProvider")
            .field("items", &self.shared.products.borrow().len())
            .finish_non_exhaustive()
    }
}

/// Consumer access to the cart.
///
/// Cheaply cloneable. A default handle belongs to no provider and fails every
/// call, as does any handle whose provider has been dropped.
#[derive(Clone, Default)]
pub struct CartHandle {
    shared: Weak<Shared>,
}

impl CartHandle {
    fn shared(&self) -> Result<Arc<Shared>> {
        self.shared.upgrade().ok_or(CartError::OutsideProvider)
    }

    /// Whether the provider behind this handle is still alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.shared.strong_count() > 0
    }

    /// Snapshot of the cart's line items.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the provider is gone.
    pub fn products(&self) -> Result<Cart> {
        let shared = self.shared()?;
        let cart = shared.products.borrow().clone();
        Ok(cart)
    }

    /// Receive every published version of the cart.
    ///
    /// The receiver starts at the current cart and is closed when the
    /// provider is dropped.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the provider is gone.
    pub fn subscribe(&self) -> Result<watch::Receiver<Cart>> {
        Ok(self.shared()?.products.subscribe())
    }

    /// Add a product, or one more unit of it if it is already in the cart.
    ///
    /// Returns the updated cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutsideProvider` if the provider is gone, or a
    /// storage error if the updated cart could not be saved. In the latter
    /// case the in-memory cart has still been updated.
    #[instrument(skip_all, fields(id = %item.id))]
    pub async fn add_to_cart(&self, item: NewCartItem) -> Result<Cart> {
        self.shared()?.apply(|cart| cart.add(item)).await
    }

    /// Add one unit of `id`. Unknown IDs leave the cart unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`CartHandle::add_to_cart`].
    #[instrument(skip_all, fields(id = %id))]
    pub async fn increment(&self, id: &ProductId) -> Result<Cart> {
        self.shared()?
            .apply(|cart| {
                if !cart.increment(id) {
                    tracing::debug!("Product not in cart");
                }
            })
            .await
    }

    /// Remove one unit of `id`, never going below one.
    ///
    /// Unknown IDs leave the cart unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`CartHandle::add_to_cart`].
    #[instrument(skip_all, fields(id = %id))]
    pub async fn decrement(&self, id: &ProductId) -> Result<Cart> {
        self.shared()?
            .apply(|cart| {
                if !cart.decrement(id) {
                    tracing::debug!("Quantity unchanged");
                }
            })
            .await
    }
}

impl std::fmt::Debug for CartHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

impl Shared {
    /// Apply `mutate` to the cart, publish the result, then save it.
    async fn apply(&self, mutate: impl FnOnce(&mut Cart)) -> Result<Cart> {
        let _guard = self.write_lock.lock().await;

        let mut cart = self.products.borrow().clone();
        mutate(&mut cart);
        self.products.send_replace(cart.clone());

        if let Err(e) = self.repository.save(&cart).await {
            tracing::warn!(error = %e, "Failed to persist cart, keeping in-memory state");
            return Err(e);
        }
        Ok(cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use go_marketplace_core::Price;

    use super::*;
    use crate::storage::MemoryStore;

    fn provider() -> CartProvider {
        CartProvider::with_cart(KeyValueCartRepository::new(MemoryStore::new()), Cart::new())
    }

    fn shirt() -> NewCartItem {
        NewCartItem {
            id: ProductId::from("p1"),
            title: "Shirt".to_string(),
            image_url: "u".to_string(),
            price: Price::from_cents(2000),
        }
    }

    #[test]
    fn test_default_handle_is_outside_provider() {
        let handle = CartHandle::default();
        assert!(!handle.is_active());
        assert!(matches!(handle.products(), Err(CartError::OutsideProvider)));
        assert!(matches!(handle.subscribe(), Err(CartError::OutsideProvider)));
    }

    #[tokio::test]
    async fn test_handle_fails_after_provider_dropped() {
        let provider = provider();
        let handle = provider.handle();
        handle.add_to_cart(shirt()).await.unwrap();
        assert!(handle.is_active());

        drop(provider);

        assert!(!handle.is_active());
        let err = handle.increment(&ProductId::from("p1")).await.unwrap_err();
        assert_eq!(err.to_string(), "cart must be used within a CartProvider");
    }

    #[tokio::test]
    async fn test_handles_share_state() {
        let provider = provider();
        let a = provider.handle();
        let b = a.clone();

        a.add_to_cart(shirt()).await.unwrap();
        b.increment(&ProductId::from("p1")).await.unwrap();

        assert_eq!(provider.handle().products().unwrap().total_quantity(), 2);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let provider = provider();
        let handle = provider.handle();
        let mut rx = handle.subscribe().unwrap();
        assert!(rx.borrow_and_update().is_empty());

        handle.add_to_cart(shirt()).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        drop(provider);
        assert!(rx.changed().await.is_err());
    }

    #[test]
    fn test_debug_output() {
        let provider = provider();
        assert!(format!("{provider:?}").contains("items: 0"));
        assert!(format!("{:?}", provider.handle()).contains("active: true"));
    }
}
