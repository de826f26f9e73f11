//! Unit price using decimal arithmetic.
//!
//! Prices come from the catalog as plain JSON numbers (no currency code), and
//! are stored the same way. Arithmetic is done in [`Decimal`] so subtotals do
//! not pick up binary floating-point drift.
//!
//! A JSON number is read back as an `f64`, which holds 15 significant decimal
//! digits exactly. Every `Price` is rounded to that precision when it is
//! created, so a stored cart always reloads to the same prices.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Quantity;

/// A unit price, in the store's currency.
///
/// ## Constraints
///
/// - At most [`Price::SIGNIFICANT_DIGITS`] significant digits; extra digits
///   are rounded half-to-even on construction.
/// - Serialized as a plain JSON number.
///
/// ## Examples
///
/// ```
/// use go_marketplace_core::Price;
///
/// let price = Price::from_cents(1999);
/// assert_eq!(price.to_string(), "$19.99");
///
/// let json = serde_json::to_string(&price).unwrap();
/// assert_eq!(json, "19.99");
/// assert_eq!(serde_json::from_str::<Price>(&json).unwrap(), price);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Significant digits an `f64` round-trips exactly.
    pub const SIGNIFICANT_DIGITS: u32 = 15;

    /// Create a new price, rounded to [`Price::SIGNIFICANT_DIGITS`].
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        let rounded = amount
            .round_sf(Self::SIGNIFICANT_DIGITS)
            // Rounding up can overflow next to Decimal::MAX.
            .or_else(|| {
                amount.round_sf_with_strategy(Self::SIGNIFICANT_DIGITS, RoundingStrategy::ToZero)
            })
            .unwrap_or(amount);
        Self(rounded.normalize())
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self::new(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Add two prices, or `None` if the sum does not fit.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self::new)
    }

    /// Price of `quantity` units, or `None` if the product does not fit.
    #[must_use]
    pub fn checked_mul(self, quantity: Quantity) -> Option<Self> {
        self.0
            .checked_mul(Decimal::from(quantity.get()))
            .map(Self::new)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Parsing the decimal text gives the correctly rounded f64.
        let value: f64 = self
            .0
            .to_string()
            .parse()
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_f64(value)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Self::new)
    }
}
