//! Cart store error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by the cart store.
#[derive(Debug, Error)]
pub enum CartError {
    /// The handle outlived the provider it was taken from.
    ///
    /// This is a programming error, not something to retry.
    #[error("cart must be used within a CartProvider")]
    OutsideProvider,

    /// Reading or writing the backing store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The stored cart could not be decoded.
    #[error("stored cart is corrupt: {0}")]
    Corrupt(String),

    /// The cart could not be encoded for storage.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl CartError {
    /// Whether this error came from the backing store or its contents.
    ///
    /// Storage errors leave the in-memory cart intact; callers can treat them
    /// as warnings.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Corrupt(_) | Self::Serialize(_))
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
