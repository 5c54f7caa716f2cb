//! # Domain Types
//!
//! Core domain types used throughout the cart.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   CustomerId    │   │    LineItem     │   │   CartRules     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  i64 newtype    │   │  item_id        │   │  min_quantity   │       │
//! │  │  = cart id      │   │  quantity       │   │  max_quantity   │       │
//! │  └─────────────────┘   │  unit_price     │   │  min_checkout   │       │
//! │                        │  added_at       │   │  _total         │       │
//! │  ┌─────────────────┐   └─────────────────┘   └─────────────────┘       │
//! │  │     ItemId      │                                                    │
//! │  │  i64 newtype    │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MIN_CHECKOUT_TOTAL_CENTS, MIN_ITEM_QUANTITY};

// =============================================================================
// Identifiers
// =============================================================================

/// Defines a type-safe `i64` identifier so customer and item ids can't be
/// swapped by accident.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates the identifier from its raw value.
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Returns the raw value.
            #[inline]
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Opaque customer identifier. Also serves as the cart id: a customer
    /// has at most one open cart.
    CustomerId
);

define_id!(
    /// Identifier of a purchasable item, unique within a cart.
    ItemId
);

// =============================================================================
// Line Item
// =============================================================================

/// One (item, quantity, price) entry in a cart.
///
/// Owned by its cart; callers only ever see shared references or clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub item_id: ItemId,

    /// Always within the owning cart's quantity bounds.
    pub quantity: i64,

    /// Price locked in when the item was first added.
    pub unit_price: Money,

    /// When the item first entered the cart.
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Creates a line item stamped with the current time.
    pub fn new(item_id: ItemId, quantity: i64, unit_price: Money) -> Self {
        LineItem {
            item_id,
            quantity,
            unit_price,
            added_at: Utc::now(),
        }
    }

    /// Line total (unit price × quantity), `None` on overflow.
    ///
    /// Items inside a cart always have a representable line total; the
    /// cart rejects any add or update that would break that.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul_quantity(self.quantity)
    }
}

// =============================================================================
// Cart Rules
// =============================================================================

/// Business rules a cart enforces.
///
/// The defaults are the shop's standing policy: 1 to 10 of any item, and a
/// $50.00 minimum order. Stores may hand carts a different set, loaded from
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartRules {
    /// Smallest allowed quantity per line (inclusive).
    pub min_quantity: i64,

    /// Largest allowed quantity per line (inclusive).
    pub max_quantity: i64,

    /// Minimum cart total for checkout (inclusive).
    pub min_checkout_total: Money,
}

impl CartRules {
    /// Checks whether `quantity` is an allowed line quantity.
    #[inline]
    pub fn allows_quantity(&self, quantity: i64) -> bool {
        (self.min_quantity..=self.max_quantity).contains(&quantity)
    }
}

impl Default for CartRules {
    fn default() -> Self {
        CartRules {
            min_quantity: MIN_ITEM_QUANTITY,
            max_quantity: MAX_ITEM_QUANTITY,
            min_checkout_total: Money::from_cents(MIN_CHECKOUT_TOTAL_CENTS),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
