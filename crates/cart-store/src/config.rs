//! # Store Configuration
//!
//! Which rules the store hands to the carts it creates.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CART_MIN_QUANTITY=1                                                │
//! │     CART_MAX_QUANTITY=10                                               │
//! │     CART_MIN_CHECKOUT_TOTAL=50.00                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/cart-store/cart.toml (Linux)                             │
//! │     ~/Library/Application Support/dev.cart.cart-store/cart.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     1..=10 per line, $50.00 minimum order                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # cart.toml
//! [rules]
//! min_quantity = 1
//! max_quantity = 10
//! min_checkout_total = "50.00"   # decimal string, sub-cent amounts allowed
//! ```

use std::path::{Path, PathBuf};

use cart_core::validation::validate_rules;
use cart_core::{CartRules, Money};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StoreResult;

/// Store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Rules for newly created carts.
    #[serde(default)]
    pub rules: CartRules,
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`cart.toml`); a missing file is not an error
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StoreResult<Self> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cart config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Same as [`StoreConfig::load`], reading overrides through `env`.
    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> StoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(env);
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> StoreResult<Self> {
        info!(?path, "Loading cart config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> StoreResult<()> {
        validate_rules(&self.rules)?;
        Ok(())
    }

    /// Applies environment variable overrides. Unparseable values are
    /// logged and ignored.
    fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env("CART_MIN_QUANTITY") {
            match value.trim().parse::<i64>() {
                Ok(qty) => {
                    debug!(min_quantity = qty, "Overriding min quantity from environment");
                    self.rules.min_quantity = qty;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid CART_MIN_QUANTITY"),
            }
        }

        if let Some(value) = env("CART_MAX_QUANTITY") {
            match value.trim().parse::<i64>() {
                Ok(qty) => {
                    debug!(max_quantity = qty, "Overriding max quantity from environment");
                    self.rules.max_quantity = qty;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid CART_MAX_QUANTITY"),
            }
        }

        // Decimal amount, e.g. "50.00"
        if let Some(value) = env("CART_MIN_CHECKOUT_TOTAL") {
            match value.parse::<Money>() {
                Ok(total) => {
                    debug!(min_checkout_total = %total, "Overriding checkout minimum from environment");
                    self.rules.min_checkout_total = total;
                }
                Err(e) => warn!(value = %value, error = %e, "Ignoring invalid CART_MIN_CHECKOUT_TOTAL"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "cart", "cart-store")
            .map(|dirs| dirs.config_dir().join("cart.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.rules, CartRules::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            StoreConfig::load_with_env(Some(dir.path().join("absent.toml")), no_env).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [rules]
            max_quantity = 25
            min_checkout_total = "25.005"
            "#,
        );

        let config = StoreConfig::load_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.rules.min_quantity, 1);
        assert_eq!(config.rules.max_quantity, 25);
        assert_eq!(config.rules.min_checkout_total, "25.005".parse::<Money>().unwrap());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[rules]\nmax_quantity = 25\n");
        let env = env_from(&[
            ("CART_MAX_QUANTITY", "12"),
            ("CART_MIN_CHECKOUT_TOTAL", "75.50"),
        ]);

        let config = StoreConfig::load_with_env(Some(path), env).unwrap();
        assert_eq!(config.rules.max_quantity, 12);
        assert_eq!(config.rules.min_checkout_total, Money::from_cents(7550));
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_from(&[
            ("CART_MIN_QUANTITY", "lots"),
            ("CART_MIN_CHECKOUT_TOTAL", "fifty"),
        ]);

        let config = StoreConfig::load_with_env(Some(dir.path().join("none.toml")), env).unwrap();
        assert_eq!(config.rules, CartRules::default());
    }

    #[test]
    fn test_inconsistent_rules_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[rules]\nmin_quantity = 5\nmax_quantity = 2\n");

        let err = StoreConfig::load_with_env(Some(path), no_env).unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[rules\nmax_quantity = ");

        let err = StoreConfig::load_with_env(Some(path.clone()), no_env).unwrap_err();
        assert!(matches!(err, StoreError::ConfigLoad(_)));

        assert_eq!(StoreConfig::load_or_default(Some(path)), StoreConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = StoreConfig::default();
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("[rules]"));
        assert_eq!(toml::from_str::<StoreConfig>(&text).unwrap(), config);
    }
}
