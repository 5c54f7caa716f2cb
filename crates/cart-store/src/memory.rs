//! # In-Memory Cart Store
//!
//! Keeps every cart a customer has had, open or checked out, in
//! registration order.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RwLock<HashMap<CustomerId, Vec<CartHandle>>>                           │
//! │                                                                         │
//! │  99 ──► [ cart#1 (checked out), cart#2 (checked out), cart#3 (open) ]   │
//! │  42 ──► [ cart#1 (open) ]                                               │
//! │                                                                         │
//! │  get(99) → cart#3        carts_for(99) → all three                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is a plain value: whoever composes the service owns it and
//! passes it where carts are needed.
//!
//! ## Growth
//! Nothing is evicted on its own. Every checkout leaves its cart in the
//! history, so a long-running process should call
//! [`MemoryCartStore::prune_checked_out`] periodically. Pruning keeps every
//! open cart.
//!
//! ## Locking
//! Open/checked-out filtering reads [`CartHandle::is_checked_out`], which
//! never touches a cart lock. The map lock is therefore never held while
//! waiting on a cart, and callers may look the store up from inside
//! `with_cart_mut`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use cart_core::{Cart, CartHandle, CartRules, CartStore, CustomerId};
use tracing::{debug, info};

use crate::config::StoreConfig;

/// Thread-safe in-memory [`CartStore`].
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    rules: CartRules,
    carts: RwLock<HashMap<CustomerId, Vec<CartHandle>>>,
}

impl MemoryCartStore {
    /// Creates an empty store using the default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store whose new carts enforce `rules`.
    pub fn with_rules(rules: CartRules) -> Self {
        MemoryCartStore {
            rules,
            carts: RwLock::default(),
        }
    }

    /// Creates an empty store from loaded configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::with_rules(config.rules)
    }

    // Handles carry their own locks, so a writer that panicked here can only
    // have left a fully pushed or unpushed entry behind.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CustomerId, Vec<CartHandle>>> {
        self.carts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CustomerId, Vec<CartHandle>>> {
        self.carts.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every cart registered for the customer, oldest first.
    pub fn carts_for(&self, customer_id: CustomerId) -> Vec<CartHandle> {
        self.read().get(&customer_id).cloned().unwrap_or_default()
    }

    /// Number of registered carts, open or checked out.
    pub fn len(&self) -> usize {
        self.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of carts not yet checked out.
    pub fn open_carts(&self) -> usize {
        self.read()
            .values()
            .flatten()
            .filter(|cart| !cart.is_checked_out())
            .count()
    }

    /// Forgets every checked-out cart and returns how many were dropped.
    ///
    /// Handles held elsewhere stay usable; the store just stops listing
    /// them in [`MemoryCartStore::carts_for`].
    pub fn prune_checked_out(&self) -> usize {
        let mut carts = self.write();
        let before: usize = carts.values().map(Vec::len).sum();

        carts.retain(|_, history| {
            history.retain(|cart| !cart.is_checked_out());
            !history.is_empty()
        });

        let pruned = before - carts.values().map(Vec::len).sum::<usize>();
        if pruned > 0 {
            info!(pruned, remaining = before - pruned, "Pruned checked-out carts");
        }
        pruned
    }
}

fn latest_open(carts: &[CartHandle]) -> Option<&CartHandle> {
    carts.iter().rev().find(|cart| !cart.is_checked_out())
}

impl CartStore for MemoryCartStore {
    fn get(&self, customer_id: CustomerId) -> Option<CartHandle> {
        let carts = self.read();
        let found = carts
            .get(&customer_id)
            .and_then(|history| latest_open(history))
            .cloned();
        debug!(customer_id = %customer_id, found = found.is_some(), "Looking up open cart");
        found
    }

    fn put(&self, cart: CartHandle) {
        let customer_id = cart.customer_id();
        debug!(customer_id = %customer_id, "Registering cart");
        self.write().entry(customer_id).or_default().push(cart);
    }

    fn rules(&self) -> CartRules {
        self.rules
    }

    /// Looks up and registers under one write lock, so concurrent callers
    /// for the same customer always end up sharing a single open cart.
    fn fetch_or_create(&self, customer_id: CustomerId) -> CartHandle {
        let mut carts = self.write();
        let history = carts.entry(customer_id).or_default();

        if let Some(cart) = latest_open(history) {
            debug!(customer_id = %customer_id, "Reusing open cart");
            return cart.clone();
        }

        let cart = CartHandle::new(Cart::with_rules(customer_id, self.rules));
        history.push(cart.clone());
        info!(
            customer_id = %customer_id,
            previous_carts = history.len() - 1,
            "Created cart"
        );
        cart
    }
}
