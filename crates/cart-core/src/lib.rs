//! # cart-core: Pure Business Logic for the Shopping Cart
//!
//! This crate holds the cart state machine and every rule it enforces,
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Architecture                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Caller (checkout workflow, API handler, demo)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ create_or_fetch / add_item / ...       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cart-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   store   │  │   │
//! │  │   │  ItemId   │  │   Money   │  │   Cart    │  │ CartStore │  │   │
//! │  │   │ LineItem  │  │ (Decimal) │  │  Rules    │  │ CartHandle│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartStore trait                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                cart-store (MemoryCartStore, config)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Identifiers, line items and cart rules
//! - [`money`] - Exact decimal Money with checked arithmetic (no floating point!)
//! - [`cart`] - The cart state machine
//! - [`store`] - Store contract and the shared cart handle
//! - [`error`] - Domain error types
//! - [`validation`] - Quantity, price and rule checks
//!
//! ## Example Usage
//!
//! ```rust
//! use cart_core::{Cart, CustomerId, ItemId, Money};
//!
//! let mut cart = Cart::new(CustomerId::new(99));
//! assert!(cart.add_item(ItemId::new(123), 4, Money::from_cents(1999)));
//! assert_eq!(cart.total(), Money::from_cents(7996)); // $79.96
//! assert!(cart.checkout());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartSummary, CheckoutOutcome};
pub use error::{CartError, CartResult, ValidationError};
pub use money::Money;
pub use store::{CartHandle, CartStore};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Smallest quantity a line item may hold.
pub const MIN_ITEM_QUANTITY: i64 = 1;

/// Largest quantity a line item may hold.
///
/// ## Business Reason
/// Keeps a single order line to a sensible size. Adding more of an item
/// that is already at the limit is rejected rather than clamped.
pub const MAX_ITEM_QUANTITY: i64 = 10;

/// Minimum cart total (inclusive) required before checkout, in cents.
pub const MIN_CHECKOUT_TOTAL_CENTS: i64 = 5000;
