//! # Validation Module
//!
//! Input validation used by the cart before it touches any state.
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart: Add / Update Item                                                │
//! │                                                                         │
//! │  checked out? ──yes──► CartError::CheckedOut                            │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  item present? (update only) ──no──► CartError::ItemNotFound            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_quantity ──► ValidationError::OutOfRange                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_unit_price (new lines) ──► ValidationError::Negative          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  line / cart total fits? ──no──► ValidationError::Overflow              │
//! │       │                                                                 │
//! │       └── OK → mutate                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::CartRules;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a line quantity against the cart's rules.
///
/// ## Example
/// ```rust
/// use cart_core::validation::validate_quantity;
/// use cart_core::CartRules;
///
/// let rules = CartRules::default();
/// assert!(validate_quantity(10, &rules).is_ok());
/// assert!(validate_quantity(0, &rules).is_err());
/// assert!(validate_quantity(11, &rules).is_err());
/// ```
pub fn validate_quantity(qty: i64, rules: &CartRules) -> ValidationResult<()> {
    if !rules.allows_quantity(qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: rules.min_quantity,
            max: rules.max_quantity,
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// Zero is allowed (free items).
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "unit price".to_string(),
        });
    }

    Ok(())
}

/// Validates a rule set before carts are built from it.
///
/// ## Rules
/// - `min_quantity` must be at least 1 (a line never holds zero items)
/// - `max_quantity` must be at least `min_quantity`
/// - `min_checkout_total` must not be negative
pub fn validate_rules(rules: &CartRules) -> ValidationResult<()> {
    if rules.min_quantity < 1 {
        return Err(ValidationError::OutOfRange {
            field: "min_quantity".to_string(),
            min: 1,
            max: i64::MAX,
        });
    }

    if rules.max_quantity < rules.min_quantity {
        return Err(ValidationError::OutOfRange {
            field: "max_quantity".to_string(),
            min: rules.min_quantity,
            max: i64::MAX,
        });
    }

    if rules.min_checkout_total.is_negative() {
        return Err(ValidationError::Negative {
            field: "min_checkout_total".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        let rules = CartRules::default();
        assert!(validate_quantity(1, &rules).is_ok());
        assert!(validate_quantity(5, &rules).is_ok());
        assert!(validate_quantity(10, &rules).is_ok());

        assert!(validate_quantity(0, &rules).is_err());
        assert!(validate_quantity(-1, &rules).is_err());
        assert!(validate_quantity(11, &rules).is_err());
    }

    #[test]
    fn test_validate_quantity_custom_rules() {
        let rules = CartRules {
            min_quantity: 2,
            max_quantity: 3,
            ..CartRules::default()
        };
        assert!(validate_quantity(1, &rules).is_err());
        assert!(validate_quantity(3, &rules).is_ok());
        assert_eq!(
            validate_quantity(4, &rules).unwrap_err().to_string(),
            "quantity must be between 2 and 3"
        );
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::zero()).is_ok());
        assert!(validate_unit_price(Money::from_cents(1999)).is_ok());
        assert!(validate_unit_price(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_rules() {
        assert!(validate_rules(&CartRules::default()).is_ok());

        let zero_min = CartRules {
            min_quantity: 0,
            ..CartRules::default()
        };
        assert!(validate_rules(&zero_min).is_err());

        let inverted = CartRules {
            min_quantity: 5,
            max_quantity: 4,
            ..CartRules::default()
        };
        assert!(validate_rules(&inverted).is_err());

        let negative_total = CartRules {
            min_checkout_total: Money::from_cents(-1),
            ..CartRules::default()
        };
        assert!(validate_rules(&negative_total).is_err());

        let free_checkout = CartRules {
            min_checkout_total: Money::zero(),
            ..CartRules::default()
        };
        assert!(validate_rules(&free_checkout).is_ok());
    }
}
