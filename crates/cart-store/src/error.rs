//! # Store Error Types
//!
//! Errors raised while setting up a store. Cart operations themselves never
//! fail at the store level; they report through `cart_core::CartError`.

use cart_core::ValidationError;
use thiserror::Error;

/// Result type alias for store setup.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store setup errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    /// The loaded rules are inconsistent.
    #[error("Invalid cart configuration: {0}")]
    InvalidConfig(#[from] ValidationError),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::ConfigLoad(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoad(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_becomes_config_load() {
        let err: StoreError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, StoreError::ConfigLoad(_)));
        assert_eq!(err.to_string(), "Failed to load config: gone");
    }

    #[test]
    fn test_validation_error_becomes_invalid_config() {
        let err: StoreError = ValidationError::Negative {
            field: "min_checkout_total".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid cart configuration: min_checkout_total must not be negative"
        );
    }
}
