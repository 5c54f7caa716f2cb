//! # Store Contract
//!
//! The cart depends on one collaborator: something that maps a customer to
//! their open cart. This module defines that contract and the shared handle
//! carts are passed around in.
//!
//! ## Fetch-or-Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart::create_or_fetch(store, customer)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.get(customer) ── Some(open cart) ──► return it                   │
//! │       │ None                                                            │
//! │       ▼                                                                 │
//! │  Cart::with_rules(customer, store.rules())                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.put(handle.clone()) ──► return handle                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! Each cart sits behind its own `Mutex` inside a [`CartHandle`], so at
//! most one caller mutates a given cart at a time. The store shares the
//! handle, not a copy: mutations made through any clone are visible to
//! every other holder, and the store never needs updating after `put`.
//!
//! The handle also mirrors the cart's checked-out flag in an atomic, so a
//! store can tell open carts from finished ones without locking any cart.
//! Stores must never take a cart lock while holding their own lock: a
//! caller inside `with_cart_mut` may be about to look the store up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::cart::Cart;
use crate::types::{CartRules, CustomerId};

// =============================================================================
// Cart Handle
// =============================================================================

/// Shared, lockable reference to one cart.
///
/// Cloning the handle clones the reference, not the cart.
#[derive(Debug, Clone)]
pub struct CartHandle {
    customer_id: CustomerId,
    cart: Arc<Mutex<Cart>>,
    checked_out: Arc<AtomicBool>,
}

impl CartHandle {
    /// Wraps a cart for sharing.
    pub fn new(cart: Cart) -> Self {
        CartHandle {
            customer_id: cart.customer_id(),
            checked_out: Arc::new(AtomicBool::new(cart.is_checked_out())),
            cart: Arc::new(Mutex::new(cart)),
        }
    }

    /// The owning customer (and cart id). Does not take the lock.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    // A panic while holding the lock can't leave the cart half-mutated
    // (every mutation validates first), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust
    /// use cart_core::{Cart, CartHandle, CustomerId};
    ///
    /// let handle = CartHandle::new(Cart::new(CustomerId::new(1)));
    /// assert_eq!(handle.with_cart(|cart| cart.item_count()), 0);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.lock();
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust
    /// use cart_core::{Cart, CartHandle, CustomerId, ItemId, Money};
    ///
    /// let handle = CartHandle::new(Cart::new(CustomerId::new(1)));
    /// let added = handle.with_cart_mut(|cart| {
    ///     cart.add_item(ItemId::new(7), 2, Money::from_cents(2500))
    /// });
    /// assert!(added);
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut guard = WriteGuard {
            cart: self.lock(),
            checked_out: &self.checked_out,
        };
        f(&mut guard.cart)
    }

    /// Whether the cart has been checked out.
    ///
    /// Reads the mirrored flag and never blocks on the cart lock, so it is
    /// safe to call while another thread (or this one) holds the cart.
    pub fn is_checked_out(&self) -> bool {
        self.checked_out.load(Ordering::Acquire)
    }

    /// True if both handles point at the same cart.
    pub fn same_cart(&self, other: &CartHandle) -> bool {
        Arc::ptr_eq(&self.cart, &other.cart)
    }

    /// Copy of the cart's current state.
    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }
}

/// Write access to a cart. Publishes the checked-out flag before the lock
/// is released, including when the caller's closure panics.
struct WriteGuard<'a> {
    cart: MutexGuard<'a, Cart>,
    checked_out: &'a AtomicBool,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.checked_out
            .store(self.cart.is_checked_out(), Ordering::Release);
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// Maps customers to their open cart.
///
/// Implementations own their storage and are injected by whatever composes
/// the cart (a service, a request scope, a test); there is no global store.
pub trait CartStore {
    /// Returns the customer's open (not checked out) cart, if any.
    ///
    /// Must not lock any cart; use [`CartHandle::is_checked_out`].
    fn get(&self, customer_id: CustomerId) -> Option<CartHandle>;

    /// Registers a newly created cart.
    fn put(&self, cart: CartHandle);

    /// Rules handed to carts this store creates.
    fn rules(&self) -> CartRules {
        CartRules::default()
    }

    /// Returns the customer's open cart, creating and registering one if
    /// none exists.
    ///
    /// The default runs `get` then `put` without holding anything in
    /// between. Stores shared across threads should override it to do both
    /// under one lock.
    fn fetch_or_create(&self, customer_id: CustomerId) -> CartHandle {
        if let Some(cart) = self.get(customer_id) {
            return cart;
        }

        let cart = CartHandle::new(Cart::with_rules(customer_id, self.rules()));
        self.put(cart.clone());
        cart
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::ItemId;

    /// List-backed store relying on the default `fetch_or_create`.
    #[derive(Default)]
    struct ListStore {
        carts: Mutex<Vec<CartHandle>>,
    }

    impl CartStore for ListStore {
        fn get(&self, customer_id: CustomerId) -> Option<CartHandle> {
            self.carts
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.customer_id() == customer_id && !c.is_checked_out())
                .cloned()
        }

        fn put(&self, cart: CartHandle) {
            self.carts.lock().unwrap().push(cart);
        }
    }

    fn checkout_once(handle: &CartHandle) {
        let checked_out = handle.with_cart_mut(|cart| {
            assert!(cart.add_item(ItemId::new(1), 1, Money::from_cents(5000)));
            cart.checkout()
        });
        assert!(checked_out);
    }

    #[test]
    fn test_setup_cart() {
        let store = ListStore::default();
        let cart = Cart::create_or_fetch(&store, CustomerId::new(99));

        assert_eq!(cart.customer_id(), CustomerId::new(99));
        assert!(!cart.is_checked_out());
        assert_eq!(store.carts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_create_or_fetch_returns_same_open_cart() {
        let store = ListStore::default();
        let first = Cart::create_or_fetch(&store, CustomerId::new(99));
        first.with_cart_mut(|cart| {
            assert!(cart.add_item(ItemId::new(123), 4, Money::from_cents(1999)));
        });

        let second = Cart::create_or_fetch(&store, CustomerId::new(99));
        assert!(first.same_cart(&second));
        assert_eq!(second.with_cart(|cart| cart.item_count()), 1);
        assert_eq!(store.carts.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_create_or_fetch_after_checkout_starts_fresh() {
        let store = ListStore::default();
        let first = Cart::create_or_fetch(&store, CustomerId::new(99));
        checkout_once(&first);

        let second = Cart::create_or_fetch(&store, CustomerId::new(99));
        assert!(!first.same_cart(&second));
        assert!(!second.is_checked_out());
        assert_eq!(second.with_cart(|cart| cart.item_count()), 0);
        assert_eq!(store.carts.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_customers_get_separate_carts() {
        let store = ListStore::default();
        let alice = Cart::create_or_fetch(&store, CustomerId::new(1));
        let bob = Cart::create_or_fetch(&store, CustomerId::new(2));
        assert!(!alice.same_cart(&bob));
    }

    #[test]
    fn test_handle_clones_share_state() {
        let handle = CartHandle::new(Cart::new(CustomerId::new(3)));
        let clone = handle.clone();
        clone.with_cart_mut(|cart| {
            assert!(cart.add_item(ItemId::new(9), 2, Money::from_cents(100)));
        });

        assert_eq!(handle.with_cart(Cart::item_count), 1);

        let snapshot = handle.snapshot();
        handle.with_cart_mut(|cart| assert!(cart.reset()));
        assert_eq!(snapshot.item_count(), 1);
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let handle = CartHandle::new(Cart::new(CustomerId::new(4)));
        let poisoner = handle.clone();
        let result = std::thread::spawn(move || {
            poisoner.with_cart_mut(|_| panic!("boom"));
        })
        .join();
        assert!(result.is_err());

        assert!(handle.with_cart_mut(|cart| cart.add_item(
            ItemId::new(1),
            1,
            Money::from_cents(1)
        )));
    }

    #[test]
    fn test_checked_out_flag_follows_cart() {
        let handle = CartHandle::new(Cart::new(CustomerId::new(5)));
        assert!(!handle.is_checked_out());

        checkout_once(&handle);
        assert!(handle.is_checked_out());
        assert!(handle.clone().is_checked_out());

        let finished = CartHandle::new(handle.snapshot());
        assert!(finished.is_checked_out());
    }

    #[test]
    fn test_store_lookup_while_holding_cart_lock() {
        let store = ListStore::default();
        let cart = Cart::create_or_fetch(&store, CustomerId::new(6));

        let found = cart.with_cart_mut(|c| {
            assert!(c.add_item(ItemId::new(1), 1, Money::from_cents(100)));
            store.get(CustomerId::new(6))
        });
        assert!(found.is_some_and(|found| found.same_cart(&cart)));

        let again = cart.with_cart(|_| Cart::create_or_fetch(&store, CustomerId::new(6)));
        assert!(again.same_cart(&cart));
    }
}
