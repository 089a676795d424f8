//! # Collaborator Traits
//!
//! The cart talks to the outside world only through these traits, so every
//! collaborator can be swapped for an in-memory fake.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      CartManager Collaborators                          │
//! │                                                                         │
//! │                       ┌────────────────┐                                │
//! │        StockQuery ◄───┤                ├───► PersistentStore            │
//! │      (every add/      │  CartManager   │     (read at startup,          │
//! │       update)         │                │      write per mutation)       │
//! │                       │                │                                │
//! │      CatalogQuery ◄───┤                ├───► Notifier                   │
//! │      (first add of    └────────────────┘     (toasts, fire-and-forget)  │
//! │       a product)                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use storefront_core::{Product, ProductId, Stock};

use crate::error::{LookupResult, StoreResult};
use crate::notify::Notification;

/// Inventory lookups.
#[async_trait]
pub trait StockQuery: Send + Sync {
    /// Fetches the stock record for `id`.
    ///
    /// ## Returns
    /// * `Ok(Some(stock))` - record found
    /// * `Ok(None)` - the service has no record for this product
    /// * `Err(_)` - the lookup itself failed
    async fn stock(&self, id: ProductId) -> LookupResult<Option<Stock>>;
}

/// Catalog lookups.
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// Fetches the catalog record for `id`.
    ///
    /// A missing product is `Err(LookupError::NotFound)`.
    async fn product(&self, id: ProductId) -> LookupResult<Product>;
}

/// Key-value storage for the serialized cart.
///
/// Synchronous, like the browser's local storage it stands in for.
pub trait PersistentStore: Send + Sync {
    /// Reads the value stored under `key`, if any.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// Receives user-facing messages. Must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}
