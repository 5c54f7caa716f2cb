//! # Error Types
//!
//! Domain-specific error types for cart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cart-core errors (this file)                                          │
//! │  ├── CartError        - Rejected cart mutations                        │
//! │  └── ValidationError  - Input / rule validation failures               │
//! │                                                                         │
//! │  cart-store errors (separate crate)                                    │
//! │  └── StoreError       - Configuration loading failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CartError → bool (public cart operations)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rejections are expected control flow. The boolean cart operations log
//! the error and return `false`; the `try_*` operations hand it back.

use thiserror::Error;

use crate::types::{CustomerId, ItemId};

// =============================================================================
// Cart Error
// =============================================================================

/// A business rule rejected a cart mutation.
///
/// A rejected mutation never leaves the cart partially updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The cart has been checked out and is now read-only.
    ///
    /// ## When This Occurs
    /// - Any add / update / remove / reset after a successful checkout
    #[error("Cart {cart_id} is checked out")]
    CheckedOut { cart_id: CustomerId },

    /// No line item with this identifier is in the cart.
    #[error("Item \"{0}\" not found")]
    ItemNotFound(ItemId),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// An amount would exceed what Money can represent.
    #[error("{field} is too large")]
    Overflow { field: String },

    /// Invalid format (e.g., unparseable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CartResult<T> = Result<T, CartError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CartError::ItemNotFound(ItemId::new(123));
        assert_eq!(err.to_string(), "Item \"123\" not found");

        let err = CartError::CheckedOut {
            cart_id: CustomerId::new(99),
        };
        assert_eq!(err.to_string(), "Cart 99 is checked out");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 10,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 10");

        let err = ValidationError::Negative {
            field: "unit price".to_string(),
        };
        assert_eq!(err.to_string(), "unit price must not be negative");
    }

    #[test]
    fn test_validation_converts_to_cart_error() {
        let validation_err = ValidationError::Negative {
            field: "unit price".to_string(),
        };
        let cart_err: CartError = validation_err.into();
        assert!(matches!(cart_err, CartError::Validation(_)));
    }
}
