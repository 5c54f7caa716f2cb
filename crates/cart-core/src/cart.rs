//! # Cart
//!
//! The per-customer cart state machine.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Lifecycle                                  │
//! │                                                                         │
//! │   create_or_fetch()                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │   ┌───────────┐  add / update / remove / reset   ┌───────────┐          │
//! │   │   OPEN    │ ◄──────────────────────────────► │   OPEN    │          │
//! │   └─────┬─────┘                                  └───────────┘          │
//! │         │ checkout() with items and total >= minimum                    │
//! │         ▼                                                               │
//! │   ┌─────────────┐                                                       │
//! │   │ CHECKED OUT │  every mutation rejected, state frozen                │
//! │   └─────────────┘                                                       │
//! │                                                                         │
//! │   The next create_or_fetch() for the customer starts a fresh cart.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Flavours of Every Mutation
//! - `add_item`, `update_item`, ... return `bool` and log the reason for a
//!   rejection at `debug` level.
//! - `try_add_item`, `try_update_item`, ... return [`CartResult`] so callers
//!   can tell the rejections apart.
//!
//! Either way a rejected call leaves the cart untouched.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CartError, CartResult, ValidationError};
use crate::money::Money;
use crate::store::{CartHandle, CartStore};
use crate::types::{CartRules, CustomerId, ItemId, LineItem};
use crate::validation::{validate_quantity, validate_unit_price};

// =============================================================================
// Checkout Outcome
// =============================================================================

/// What a checkout attempt did.
///
/// `Cart::checkout` folds this into the resulting `checked_out` flag;
/// `Cart::finalize` returns it whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutOutcome {
    /// The cart was open and valid; it is now checked out.
    Finalized,
    /// The cart had already been checked out; nothing changed.
    AlreadyCheckedOut,
    /// The cart is empty or below the minimum total; it stays open.
    Rejected,
}

impl CheckoutOutcome {
    /// Returns the cart's `checked_out` flag after the attempt.
    #[inline]
    pub fn is_checked_out(&self) -> bool {
        matches!(
            self,
            CheckoutOutcome::Finalized | CheckoutOutcome::AlreadyCheckedOut
        )
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A customer's cart.
///
/// ## Invariants
/// - Items are unique by `item_id` (adding an existing item merges quantities)
/// - Every quantity is within `rules` bounds
/// - Every line total and the cart total fit in [`Money`]
/// - Once checked out, items and the checked-out flag never change
///
/// The cart id is the customer id: a customer has at most one open cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    customer_id: CustomerId,
    items: Vec<LineItem>,
    checked_out: bool,
    rules: CartRules,
    created_at: DateTime<Utc>,
    checked_out_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// Creates an empty, open cart with the default rules.
    pub fn new(customer_id: CustomerId) -> Self {
        Self::with_rules(customer_id, CartRules::default())
    }

    /// Creates an empty, open cart enforcing `rules`.
    pub fn with_rules(customer_id: CustomerId, rules: CartRules) -> Self {
        Cart {
            customer_id,
            items: Vec::new(),
            checked_out: false,
            rules,
            created_at: Utc::now(),
            checked_out_at: None,
        }
    }

    /// Returns the customer's open cart from `store`, creating and
    /// registering a new one if there is none.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let store = MemoryCartStore::new();
    /// let cart = Cart::create_or_fetch(&store, CustomerId::new(99));
    /// cart.with_cart_mut(|cart| cart.add_item(ItemId::new(123), 9, price));
    /// ```
    pub fn create_or_fetch<S>(store: &S, customer_id: CustomerId) -> CartHandle
    where
        S: CartStore + ?Sized,
    {
        store.fetch_or_create(customer_id)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Same as the customer id.
    pub fn cart_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn is_checked_out(&self) -> bool {
        self.checked_out
    }

    pub fn rules(&self) -> &CartRules {
        &self.rules
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When checkout succeeded, if it has.
    pub fn checked_out_at(&self) -> Option<DateTime<Utc>> {
        self.checked_out_at
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Looks up a line item by id.
    pub fn get_item(&self, item_id: ItemId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    /// Snapshot of the items keyed by their 0-based position.
    pub fn item_list(&self) -> BTreeMap<usize, LineItem> {
        self.items.iter().cloned().enumerate().collect()
    }

    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Exact sum of line totals, `None` if it does not fit in [`Money`].
    pub fn checked_total(&self) -> Option<Money> {
        sum_lines(&self.items, Money::zero())
    }

    /// Exact sum of line totals; zero for an empty cart.
    ///
    /// Mutations that would overflow are rejected, so the saturating
    /// fallback is never reached through the public API.
    pub fn total(&self) -> Money {
        self.checked_total().unwrap_or(Money::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Totals for responses and logs.
    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self)
    }

    /// True iff the cart has at least one item and the total reaches the
    /// minimum (inclusive).
    pub fn is_valid_for_checkout(&self) -> bool {
        !self.items.is_empty()
            && matches!(self.checked_total(), Some(total) if total >= self.rules.min_checkout_total)
    }

    // =========================================================================
    // Mutations (fallible)
    // =========================================================================

    fn ensure_open(&self) -> CartResult<()> {
        if self.checked_out {
            return Err(CartError::CheckedOut {
                cart_id: self.customer_id,
            });
        }
        Ok(())
    }

    /// Rejects a line of `quantity` × `unit_price` for `item_id` whose line
    /// total, or the cart total with it in place, would overflow.
    fn ensure_representable(
        &self,
        item_id: ItemId,
        quantity: i64,
        unit_price: Money,
    ) -> CartResult<()> {
        let line = unit_price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| overflow("line total"))?;

        let others = self.items.iter().filter(|i| i.item_id != item_id);
        sum_lines(others, line)
            .map(|_| ())
            .ok_or_else(|| overflow("cart total"))
    }

    /// Removes every item.
    pub fn try_reset(&mut self) -> CartResult<()> {
        self.ensure_open()?;
        self.items.clear();
        Ok(())
    }

    /// Adds `quantity` of an item.
    ///
    /// ## Behavior
    /// - Item not in cart: appended with `unit_price`
    /// - Item already in cart: quantities are merged through
    ///   [`Cart::try_update_item`]; the price recorded on the first add is
    ///   kept and `unit_price` is ignored
    pub fn try_add_item(
        &mut self,
        item_id: ItemId,
        quantity: i64,
        unit_price: Money,
    ) -> CartResult<()> {
        self.ensure_open()?;

        if let Some(existing) = self.get_item(item_id) {
            let merged = existing.quantity.saturating_add(quantity);
            return self.try_update_item(item_id, merged);
        }

        validate_quantity(quantity, &self.rules)?;
        validate_unit_price(unit_price)?;
        self.ensure_representable(item_id, quantity, unit_price)?;

        self.items.push(LineItem::new(item_id, quantity, unit_price));
        Ok(())
    }

    /// Overwrites the quantity of an item already in the cart.
    pub fn try_update_item(&mut self, item_id: ItemId, quantity: i64) -> CartResult<()> {
        self.ensure_open()?;

        let index = self
            .items
            .iter()
            .position(|i| i.item_id == item_id)
            .ok_or(CartError::ItemNotFound(item_id))?;

        validate_quantity(quantity, &self.rules)?;
        self.ensure_representable(item_id, quantity, self.items[index].unit_price)?;

        self.items[index].quantity = quantity;
        Ok(())
    }

    /// Removes an item from the cart.
    pub fn try_remove_item(&mut self, item_id: ItemId) -> CartResult<()> {
        self.ensure_open()?;

        let index = self
            .items
            .iter()
            .position(|i| i.item_id == item_id)
            .ok_or(CartError::ItemNotFound(item_id))?;

        self.items.remove(index);
        Ok(())
    }

    /// Attempts checkout and reports exactly what happened.
    pub fn finalize(&mut self) -> CheckoutOutcome {
        if self.checked_out {
            return CheckoutOutcome::AlreadyCheckedOut;
        }

        if !self.is_valid_for_checkout() {
            debug!(
                cart_id = %self.customer_id,
                item_count = self.items.len(),
                total = %self.total(),
                "Checkout rejected"
            );
            return CheckoutOutcome::Rejected;
        }

        self.checked_out = true;
        self.checked_out_at = Some(Utc::now());
        info!(cart_id = %self.customer_id, total = %self.total(), "Cart checked out");
        CheckoutOutcome::Finalized
    }

    // =========================================================================
    // Mutations (boolean)
    // =========================================================================

    fn report(&self, operation: &'static str, result: CartResult<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                debug!(cart_id = %self.customer_id, operation, error = %err, "Cart operation rejected");
                false
            }
        }
    }

    /// Clears the cart. `false` if it is checked out.
    pub fn reset(&mut self) -> bool {
        let result = self.try_reset();
        self.report("reset", result)
    }

    /// See [`Cart::try_add_item`].
    pub fn add_item(&mut self, item_id: ItemId, quantity: i64, unit_price: Money) -> bool {
        let result = self.try_add_item(item_id, quantity, unit_price);
        self.report("add_item", result)
    }

    /// See [`Cart::try_update_item`].
    pub fn update_item(&mut self, item_id: ItemId, quantity: i64) -> bool {
        let result = self.try_update_item(item_id, quantity);
        self.report("update_item", result)
    }

    /// See [`Cart::try_remove_item`].
    pub fn remove_item(&mut self, item_id: ItemId) -> bool {
        let result = self.try_remove_item(item_id);
        self.report("remove_item", result)
    }

    /// Checks the cart out if it is valid for checkout.
    ///
    /// Returns the resulting `checked_out` flag, so `true` means either
    /// "just checked out" or "was already checked out". Use
    /// [`Cart::finalize`] to tell those apart.
    pub fn checkout(&mut self) -> bool {
        self.finalize().is_checked_out()
    }
}

fn sum_lines<'a, I>(items: I, start: Money) -> Option<Money>
where
    I: IntoIterator<Item = &'a LineItem>,
{
    items
        .into_iter()
        .try_fold(start, |acc, item| acc.checked_add(item.line_total()?))
}

fn overflow(field: &str) -> CartError {
    ValidationError::Overflow {
        field: field.to_string(),
    }
    .into()
}

// =============================================================================
// Cart Summary
// =============================================================================

/// Cart totals summary for API responses and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub customer_id: CustomerId,
    pub item_count: usize,
    pub total_quantity: i64,
    pub total: Money,
    pub checked_out: bool,
    pub valid_for_checkout: bool,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        CartSummary {
            customer_id: cart.customer_id,
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
            checked_out: cart.checked_out,
            valid_for_checkout: cart.is_valid_for_checkout(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
