//! Cart line items and the ordered cart they live in.
//!
//! [`Cart`] is what gets persisted: it serializes as a JSON array of
//! `{id, title, image_url, price, quantity}` objects in insertion order.
//! The three mutations here are pure; persistence and publishing live in the
//! `cart` crate.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, Quantity};

/// A product being added to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
}

/// One product entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
    pub quantity: Quantity,
}

impl CartItem {
    /// Unit price times quantity, or `None` if it does not fit a [`Price`].
    #[must_use]
    pub fn line_total(&self) -> Option<Price> {
        self.price.checked_mul(self.quantity)
    }
}

impl From<NewCartItem> for CartItem {
    fn from(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            image_url: item.image_url,
            price: item.price,
            quantity: Quantity::ONE,
        }
    }
}

/// Ordered list of line items.
///
/// Item IDs are unique: the only way to put an item in is [`Cart::add`],
/// which bumps the existing entry instead of inserting a duplicate.
/// Deserialized carts are taken as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a product.
    ///
    /// If an entry with the same ID exists its quantity goes up by one and its
    /// title, image and price are kept as they are. Otherwise the product is
    /// appended with a quantity of one.
    pub fn add(&mut self, item: NewCartItem) {
        match self.get_mut(&item.id) {
            Some(existing) => existing.quantity = existing.quantity.incremented(),
            None => self.items.push(CartItem::from(item)),
        }
    }

    /// Add one unit of `id`. Returns `false` if the ID is not in the cart.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        self.get_mut(id).is_some_and(|item| {
            item.quantity = item.quantity.incremented();
            true
        })
    }

    /// Remove one unit of `id`, never going below one.
    ///
    /// Returns `true` only if the quantity changed.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        self.get_mut(id).is_some_and(|item| {
            let before = item.quantity;
            item.quantity = before.decremented();
            item.quantity != before
        })
    }

    /// Look up an entry by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.id == *id)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over line items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of every line total, or `None` on overflow.
    ///
    /// Stored carts are taken as-is, so prices and quantities are not bounded.
    #[must_use]
    pub fn subtotal(&self) -> Option<Price> {
        self.items
            .iter()
            .try_fold(Price::ZERO, |acc, item| acc.checked_add(item.line_total()?))
    }
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Self { items }
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for Cart {
    type Item = CartItem;
    type IntoIter = std::vec::IntoIter<CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
