//! # Domain Types
//!
//! Core domain types shared by the cart service and the web UI.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐            ┌─────────────────────┐            │
//! │  │      Product        │            │       Stock         │            │
//! │  │  ─────────────────  │            │  ─────────────────  │            │
//! │  │  id                 │ ◄── same ──│  id                 │            │
//! │  │  title   ┐          │            │  amount (≥ 0)       │            │
//! │  │  price   ├ display  │            │  available units    │            │
//! │  │  image   ┘          │            └─────────────────────┘            │
//! │  │  amount (≥ 1)       │                                               │
//! │  │  units in the cart  │                                               │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Product` doubles as the catalog record (where `amount` is irrelevant and
//! defaults to zero on the wire) and as the cart entry.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Identifier shared by catalog products and stock records.
pub type ProductId = u64;

// =============================================================================
// Product
// =============================================================================

/// A catalog product, and the cart entry built from it.
///
/// ## Snapshot Semantics
/// Display fields are captured when the product is first added to the cart
/// and reused on later quantity changes. They are not refreshed from the
/// catalog while the product stays in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,

    /// Display name.
    pub title: String,

    /// Unit price in cents.
    pub price: Money,

    /// Image URL.
    pub image: String,

    /// Units of this product in the cart.
    #[serde(default)]
    pub amount: i64,
}

impl Product {
    /// Creates a catalog product with no units in the cart.
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: Money,
        image: impl Into<String>,
    ) -> Self {
        Product {
            id,
            title: title.into(),
            price,
            image: image.into(),
            amount: 0,
        }
    }

    /// Returns a copy of this product carrying `amount` units.
    pub fn with_amount(&self, amount: i64) -> Self {
        Product {
            amount,
            ..self.clone()
        }
    }

    /// Line subtotal: unit price × amount.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.price.multiply_amount(self.amount)
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Available inventory for a product, as reported by the inventory service.
///
/// Fetched on demand and never cached: every add or update asks again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Stock {
    /// Product this record belongs to.
    pub id: ProductId,

    /// Units available for sale.
    pub amount: i64,
}

impl Stock {
    /// Creates a stock record.
    pub const fn new(id: ProductId, amount: i64) -> Self {
        Stock { id, amount }
    }

    /// Checks whether `requested` units can be held in the cart.
    ///
    /// ## Returns
    /// * `Ok(())` - `requested` is within the available amount
    /// * `Err(CoreError::StockExceeded)` - more units requested than available
    pub fn check(&self, requested: i64) -> CoreResult<()> {
        if requested > self.amount {
            return Err(CoreError::StockExceeded {
                product_id: self.id,
                requested,
                available: self.amount,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Update Request
// =============================================================================

/// Request to set a product's cart amount to an exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

impl UpdateProductAmount {
    pub const fn new(product_id: ProductId, amount: i64) -> Self {
        UpdateProductAmount { product_id, amount }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
