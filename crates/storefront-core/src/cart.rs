//! # Cart
//!
//! The cart collection and the pure rules for changing it.
//!
//! ## Reconciliation Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Transitions (all pure)                          │
//! │                                                                         │
//! │  with_entry(product, n) ──► drop any entry with the same id,            │
//! │                             append product carrying n units             │
//! │                                                                         │
//! │  with_amount(id, n) ──────► n ≥ 1? entry present? then with_entry       │
//! │                                                                         │
//! │  without(id) ─────────────► entry present? then drop it                 │
//! │                                                                         │
//! │  Every transition returns a NEW cart. The caller persists it and only   │
//! │  then swaps it in, so a failed write never leaves a half-applied cart.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Entries are unique by `id`
//! - Every entry has `amount >= 1`
//!
//! Replacing an entry moves it to the end of the collection. Order carries
//! no meaning beyond display.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, ProductId};
use crate::validation::validate_amount;

// =============================================================================
// Cart
// =============================================================================

/// The user's current selection of products.
///
/// Serializes as a bare JSON array of [`Product`] records, which is the
/// persisted format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<Product>,
}

/// What [`Cart::from_records`] had to discard while rebuilding a cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartRepairs {
    /// Records whose amount was below 1.
    pub invalid_amounts: usize,

    /// Records whose id was already taken by an earlier record.
    pub duplicate_ids: usize,
}

impl CartRepairs {
    /// True when nothing was discarded.
    pub fn is_clean(&self) -> bool {
        self.invalid_amounts == 0 && self.duplicate_ids == 0
    }
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from stored records, enforcing the invariants.
    ///
    /// ## Behavior
    /// - Records with `amount < 1` are dropped
    /// - For duplicate ids the first record wins
    ///
    /// ```rust
    /// use storefront_core::{Cart, Money, Product};
    ///
    /// let shoe = Product::new(1, "Shoe", Money::from_cents(100), "s.jpg");
    /// let (cart, repairs) = Cart::from_records(vec![
    ///     shoe.with_amount(2),
    ///     shoe.with_amount(5),
    ///     Product::new(2, "Sock", Money::from_cents(10), "k.jpg"),
    /// ]);
    ///
    /// assert_eq!(cart.amount_of(1), 2);
    /// assert!(!cart.contains(2));
    /// assert_eq!(repairs.duplicate_ids, 1);
    /// assert_eq!(repairs.invalid_amounts, 1);
    /// ```
    pub fn from_records(records: Vec<Product>) -> (Self, CartRepairs) {
        let mut repairs = CartRepairs::default();
        let mut seen = HashSet::with_capacity(records.len());
        let mut items = Vec::with_capacity(records.len());

        for record in records {
            if record.amount < 1 {
                repairs.invalid_amounts += 1;
                continue;
            }
            if !seen.insert(record.id) {
                repairs.duplicate_ids += 1;
                continue;
            }
            items.push(record);
        }

        (Cart { items }, repairs)
    }

    /// Returns the entries in display order.
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Looks up the entry for `id`.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    /// Checks whether `id` has an entry.
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Units of `id` in the cart (0 when absent).
    pub fn amount_of(&self, id: ProductId) -> i64 {
        self.get(id).map_or(0, |p| p.amount)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns a cart where `product` holds exactly `amount` units.
    ///
    /// Any existing entry with the same id is replaced, and the new entry is
    /// appended at the end. Callers validate `amount` first.
    pub fn with_entry(&self, product: Product, amount: i64) -> Cart {
        let mut items: Vec<Product> = self
            .items
            .iter()
            .filter(|p| p.id != product.id)
            .cloned()
            .collect();
        items.push(Product { amount, ..product });
        Cart { items }
    }

    /// Returns a cart where the existing entry for `id` holds `amount`
    /// units. Display fields are kept as they are.
    ///
    /// ## Errors
    /// - `Validation` if `amount < 1`
    /// - `NotInCart` if `id` has no entry
    pub fn with_amount(&self, id: ProductId, amount: i64) -> CoreResult<Cart> {
        validate_amount(amount)?;

        let existing = self.get(id).cloned().ok_or(CoreError::NotInCart(id))?;
        Ok(self.with_entry(existing, amount))
    }

    /// Returns a cart without the entry for `id`.
    ///
    /// ## Errors
    /// - `NotInCart` if `id` has no entry
    pub fn without(&self, id: ProductId) -> CoreResult<Cart> {
        if !self.contains(id) {
            return Err(CoreError::NotInCart(id));
        }

        let items = self.items.iter().filter(|p| p.id != id).cloned().collect();
        Ok(Cart { items })
    }

    /// Total units across all entries.
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |acc, p| acc.saturating_add(p.amount))
    }

    /// Sum of line subtotals.
    pub fn total(&self) -> Money {
        self.items.iter().map(Product::subtotal).sum()
    }

    /// Summary figures for display.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart summary for the header badge and the cart page footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Distinct products (the header badge).
    pub item_count: usize,

    /// Units across all products.
    pub total_quantity: i64,

    /// Σ price × amount.
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.len(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
