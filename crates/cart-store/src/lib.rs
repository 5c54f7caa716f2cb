//! # cart-store: Cart Storage for the Shopping Cart
//!
//! The collaborator side of `cart-core`: an in-memory implementation of
//! [`cart_core::CartStore`] plus the configuration that decides which rules
//! new carts get.
//!
//! ## Usage
//! ```rust
//! use cart_core::{Cart, CustomerId, ItemId, Money};
//! use cart_store::{MemoryCartStore, StoreConfig};
//!
//! let store = MemoryCartStore::from_config(&StoreConfig::default());
//! let cart = Cart::create_or_fetch(&store, CustomerId::new(99));
//!
//! let checked_out = cart.with_cart_mut(|cart| {
//!     cart.add_item(ItemId::new(123), 3, Money::from_cents(1999));
//!     cart.checkout()
//! });
//! assert!(checked_out);
//! ```

pub mod config;
pub mod error;
pub mod memory;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryCartStore;
