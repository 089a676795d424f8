//! # In-Memory Adapters
//!
//! Collaborators backed by plain maps. Used by tests and by the demo
//! binary when no API is configured.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use storefront_core::{Product, ProductId, Stock};

use crate::error::{LookupError, LookupResult, StoreError, StoreResult};
use crate::notify::Notification;
use crate::ports::{CatalogQuery, Notifier, PersistentStore, StockQuery};

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// =============================================================================
// Memory Inventory
// =============================================================================

/// Catalog and stock held in memory.
///
/// ## Usage
/// ```rust
/// use storefront_cart::adapters::MemoryInventory;
/// use storefront_core::{Money, Product};
///
/// let inventory = MemoryInventory::new()
///     .with_product(Product::new(1, "Tênis de Caminhada", Money::from_cents(17990), "1.jpg"), 10);
/// assert_eq!(inventory.stock_lookups(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryInventory {
    products: Mutex<HashMap<ProductId, Product>>,
    stock: Mutex<HashMap<ProductId, i64>>,
    offline: AtomicBool,
    stock_lookups: AtomicUsize,
    catalog_lookups: AtomicUsize,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a catalog product with `available` units in stock.
    pub fn with_product(self, product: Product, available: i64) -> Self {
        self.set_stock(product.id, available);
        lock(&self.products).insert(product.id, product);
        self
    }

    /// Sets (or creates) the stock record for `id`.
    pub fn set_stock(&self, id: ProductId, available: i64) {
        lock(&self.stock).insert(id, available);
    }

    /// Deletes the stock record for `id`, leaving the catalog entry.
    pub fn remove_stock(&self, id: ProductId) {
        lock(&self.stock).remove(&id);
    }

    /// While offline, every lookup fails as if the network were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stock lookups served so far.
    pub fn stock_lookups(&self) -> usize {
        self.stock_lookups.load(Ordering::SeqCst)
    }

    /// Number of catalog lookups served so far.
    pub fn catalog_lookups(&self) -> usize {
        self.catalog_lookups.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> LookupResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(LookupError::Unavailable("inventory is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl StockQuery for MemoryInventory {
    async fn stock(&self, id: ProductId) -> LookupResult<Option<Stock>> {
        self.stock_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        Ok(lock(&self.stock).get(&id).map(|&amount| Stock::new(id, amount)))
    }
}

#[async_trait]
impl CatalogQuery for MemoryInventory {
    async fn product(&self, id: ProductId) -> LookupResult<Product> {
        self.catalog_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        lock(&self.products)
            .get(&id)
            .cloned()
            .ok_or(LookupError::NotFound {
                resource: "Product",
                id,
            })
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Key-value store held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
    read_only: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `value` under `key`.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::default();
        lock(&store.entries).insert(key.into(), value.into());
        store
    }

    /// Raw value under `key`, bypassing the trait.
    pub fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// While read-only, every write fails (simulates a full quota).
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

impl PersistentStore for MemoryStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is read-only".into()));
        }

        lock(&self.entries).insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// Memory Notifier
// =============================================================================

/// Records every notification it receives.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    received: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    pub fn received(&self) -> Vec<Notification> {
        lock(&self.received).clone()
    }

    /// Removes and returns everything received so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *lock(&self.received))
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        lock(&self.received).push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::Money;

    fn inventory() -> MemoryInventory {
        MemoryInventory::new()
            .with_product(Product::new(1, "Shoe", Money::from_cents(100), "1.jpg"), 4)
    }

    #[tokio::test]
    async fn test_inventory_lookups() {
        let inventory = inventory();

        assert_eq!(inventory.stock(1).await.unwrap(), Some(Stock::new(1, 4)));
        assert_eq!(inventory.stock(2).await.unwrap(), None);
        assert_eq!(inventory.product(1).await.unwrap().title, "Shoe");
        assert!(matches!(
            inventory.product(2).await,
            Err(LookupError::NotFound { id: 2, .. })
        ));

        assert_eq!(inventory.stock_lookups(), 2);
        assert_eq!(inventory.catalog_lookups(), 2);
    }

    #[tokio::test]
    async fn test_inventory_offline() {
        let inventory = inventory();
        inventory.set_offline(true);

        assert!(matches!(inventory.stock(1).await, Err(LookupError::Unavailable(_))));
        assert!(inventory.product(1).await.is_err());
    }

    #[test]
    fn test_store_read_write() {
        let store = MemoryStore::new();
        assert_eq!(store.read("k").unwrap(), None);

        store.write("k", "[]").unwrap();
        assert_eq!(store.read("k").unwrap(), Some("[]".to_string()));
        assert_eq!(store.writes(), 1);

        store.set_read_only(true);
        assert!(store.write("k", "[1]").is_err());
        assert_eq!(store.get("k"), Some("[]".to_string()));
    }
}
