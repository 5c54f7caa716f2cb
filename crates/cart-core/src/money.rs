//! # Money Module
//!
//! Provides the `Money` type for handling monetary values exactly.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    4 × 19.99 = 79.96000000000001  ❌ WRONG!                             │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal                                          │
//! │    4 × 19.99 = 79.96              ✅                                    │
//! │    3 × 0.125 = 0.375              ✅ (sub-cent prices stay exact)       │
//! │                                                                         │
//! │  The checkout minimum ($50.00) is compared against an exact sum, so    │
//! │  a cart totalling exactly $50.00 always qualifies.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overflow
//! All arithmetic is checked. The cart refuses any mutation whose line or
//! cart total would not fit, so a cart's totals are always representable.
//!
//! ## Usage
//! ```rust
//! use cart_core::money::Money;
//!
//! let price: Money = "19.99".parse().unwrap();
//! assert_eq!(price, Money::from_cents(1999));
//! assert_eq!(price.checked_mul_quantity(4).unwrap().to_string(), "$79.96");
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// An exact monetary amount in major units (dollars), backed by `Decimal`.
///
/// ## Design Decisions
/// - **Decimal, not cents**: prices with more than two decimals (`0.125`)
///   are legal and must survive unchanged
/// - **Single field tuple struct**: zero-cost wrapper, serialized as the
///   decimal string (`"19.99"`)
/// - **No unchecked operators**: every sum and product goes through
///   `checked_*` so overflow is a value, not a panic
///
/// ## Where Money is Used
/// ```text
/// LineItem.unit_price ──► LineItem.line_total ──► Cart.total
///                                                     │
///                          CartRules.min_checkout ────┴──► is_valid_for_checkout
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Largest representable amount.
    pub const MAX: Money = Money(Decimal::MAX);

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use cart_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Multiplies by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use cart_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1999); // $19.99
    /// assert_eq!(unit_price.checked_mul_quantity(9), Some(Money::from_cents(17991)));
    /// assert_eq!(Money::MAX.checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_mul_quantity(self, qty: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a decimal amount such as `"19.99"`, `"50"` or `"0.125"`.
///
/// A leading `$` is tolerated.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);

        let amount = Decimal::from_str(unsigned).map_err(|e| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Money(if negative { -amount } else { amount }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `$12.34` (at least two decimals), for logs.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let mut abs = self.0.abs();
        if abs.scale() < 2 {
            abs.rescale(2);
        }
        write!(f, "{}${}", sign, abs)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
