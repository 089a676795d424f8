//! # Cart Manager
//!
//! Owns the cart, validates every change against live stock, and keeps the
//! persisted copy in step with the in-memory one.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operation Flow                                  │
//! │                                                                         │
//! │  UI action                                                              │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  lock operation mutex  (one operation at a time per manager)           │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  validate ── amount ≥ 1? ── StockQuery ── CatalogQuery (new product)   │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  next cart = pure transition on the current cart (storefront-core)     │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  PersistentStore.write(next) ──fails──► cart unchanged, notify error   │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  publish next cart to subscribers                                      │
//! │                                                                         │
//! │  Any refusal: log, send one Notification, return Err(CartError).       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use storefront_core::validation::{validate_amount, validate_product};
use storefront_core::{Cart, CartTotals, Product, ProductId, UpdateProductAmount};
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

use crate::config::CartConfig;
use crate::error::{CartError, CartResult, LookupError, Operation};
use crate::notify::Notification;
use crate::ports::{CatalogQuery, Notifier, PersistentStore, StockQuery};

/// The collaborators a [`CartManager`] is built from.
#[derive(Clone)]
pub struct CartDeps {
    pub stock: Arc<dyn StockQuery>,
    pub catalog: Arc<dyn CatalogQuery>,
    pub store: Arc<dyn PersistentStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// Shopping cart state container.
///
/// ## Sharing
/// Construct once and share behind an `Arc`. Operations take `&self`;
/// overlapping calls on the same manager run one after another.
///
/// ## Usage
/// ```rust
/// use std::sync::Arc;
/// use storefront_cart::adapters::{MemoryInventory, MemoryNotifier, MemoryStore};
/// use storefront_cart::{CartConfig, CartDeps, CartManager};
/// use storefront_core::{Money, Product};
///
/// # #[tokio::main]
/// # async fn main() {
/// let inventory = Arc::new(
///     MemoryInventory::new()
///         .with_product(Product::new(1, "Tênis", Money::from_cents(17990), "1.jpg"), 10),
/// );
/// let deps = CartDeps {
///     stock: inventory.clone(),
///     catalog: inventory,
///     store: Arc::new(MemoryStore::new()),
///     notifier: Arc::new(MemoryNotifier::new()),
/// };
///
/// let manager = CartManager::load(CartConfig::default(), deps);
/// manager.add_product(1).await.unwrap();
/// assert_eq!(manager.cart().amount_of(1), 1);
/// # }
/// ```
pub struct CartManager {
    config: CartConfig,
    deps: CartDeps,
    state: watch::Sender<Cart>,
    op_lock: Mutex<()>,
}

impl CartManager {
    /// Creates a manager, restoring the cart from the store.
    ///
    /// Loading never fails: an unreadable or corrupt stored cart is logged
    /// and replaced by an empty one.
    pub fn load(config: CartConfig, deps: CartDeps) -> Self {
        let cart = restore_cart(deps.store.as_ref(), &config.storage_key);
        info!(items = cart.len(), key = %config.storage_key, "Cart loaded");

        let (state, _) = watch::channel(cart);
        CartManager {
            config,
            deps,
            state,
            op_lock: Mutex::new(()),
        }
    }

    /// Snapshot of the current cart.
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Totals for the current cart.
    pub fn totals(&self) -> CartTotals {
        self.state.borrow().totals()
    }

    /// Receives every committed cart.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Configuration this manager was built with.
    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Adds one unit of `product_id`.
    ///
    /// ## Behavior
    /// - Candidate amount = current amount (0 if absent) + 1
    /// - No stock record → failure
    /// - Candidate above stock → stock-exceeded warning
    /// - New product: details fetched from the catalog; existing entry: its
    ///   details are reused
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<()> {
        debug!(product_id, "add_product");
        let _guard = self.op_lock.lock().await;

        let result = self.try_add(product_id).await;
        self.finish(Operation::Add, product_id, result)
    }

    /// Removes the entry for `product_id`.
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<()> {
        debug!(product_id, "remove_product");
        let _guard = self.op_lock.lock().await;

        let result = self.try_remove(product_id);
        self.finish(Operation::Remove, product_id, result)
    }

    /// Sets the amount of an existing entry.
    ///
    /// ## Behavior
    /// - `amount < 1` → failure, before any lookup
    /// - No stock record → failure
    /// - Amount above stock → stock-exceeded warning
    /// - Product not in the cart → failure
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> CartResult<()> {
        let UpdateProductAmount { product_id, amount } = request;
        debug!(product_id, amount, "update_product_amount");
        let _guard = self.op_lock.lock().await;

        let result = self.try_update(product_id, amount).await;
        self.finish(Operation::Update, product_id, result)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn try_add(&self, product_id: ProductId) -> CartResult<Cart> {
        let current = self.cart();
        let existing = current.get(product_id).cloned();
        let requested = existing.as_ref().map_or(0, |p| p.amount) + 1;

        let stock = self
            .deps
            .stock
            .stock(product_id)
            .await?
            .ok_or(CartError::StockNotFound(product_id))?;
        stock.check(requested)?;

        let product = match existing {
            Some(product) => product,
            None => self.fetch_product(product_id).await?,
        };

        Ok(current.with_entry(product, requested))
    }

    fn try_remove(&self, product_id: ProductId) -> CartResult<Cart> {
        Ok(self.cart().without(product_id)?)
    }

    async fn try_update(&self, product_id: ProductId, amount: i64) -> CartResult<Cart> {
        validate_amount(amount).map_err(|_| CartError::InvalidAmount(amount))?;

        let stock = self
            .deps
            .stock
            .stock(product_id)
            .await?
            .ok_or(CartError::StockNotFound(product_id))?;
        stock.check(amount)?;

        Ok(self.cart().with_amount(product_id, amount)?)
    }

    async fn fetch_product(&self, product_id: ProductId) -> CartResult<Product> {
        let product = self
            .deps
            .catalog
            .product(product_id)
            .await
            .map_err(|e| match e {
                LookupError::NotFound { .. } => CartError::ProductNotFound(product_id),
                other => CartError::Lookup(other),
            })?;

        if product.id != product_id {
            return Err(CartError::ProductNotFound(product_id));
        }
        validate_product(&product).map_err(CartError::InvalidProduct)?;

        Ok(product)
    }

    /// Commits a successful transition or reports a refusal.
    fn finish(
        &self,
        operation: Operation,
        product_id: ProductId,
        result: CartResult<Cart>,
    ) -> CartResult<()> {
        let outcome = result.and_then(|next| self.commit(next));

        if let Err(ref err) = outcome {
            if err.is_stock_exceeded() {
                warn!(%operation, product_id, error = %err, "Cart operation refused");
            } else {
                error!(%operation, product_id, error = %err, "Cart operation failed");
            }
            self.deps
                .notifier
                .notify(Notification::for_error(operation, err, &self.config.messages));
        }

        outcome
    }

    /// Persists `next`, then publishes it. A failed write publishes nothing.
    fn commit(&self, next: Cart) -> CartResult<()> {
        let serialized = serde_json::to_string(&next)?;
        self.deps.store.write(&self.config.storage_key, &serialized)?;

        info!(items = next.len(), quantity = next.total_quantity(), "Cart updated");
        self.state.send_replace(next);
        Ok(())
    }
}

impl std::fmt::Debug for CartManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("storage_key", &self.config.storage_key)
            .field("cart", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

/// Reads the persisted cart, repairing or discarding bad data.
fn restore_cart(store: &dyn PersistentStore, key: &str) -> Cart {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            warn!(error = %e, key, "Could not read stored cart, starting empty");
            return Cart::new();
        }
    };

    let records: Vec<Product> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, key, "Stored cart is not valid JSON, starting empty");
            return Cart::new();
        }
    };

    let (cart, repairs) = Cart::from_records(records);
    if !repairs.is_clean() {
        warn!(
            invalid_amounts = repairs.invalid_amounts,
            duplicate_ids = repairs.duplicate_ids,
            "Dropped invalid entries from stored cart"
        );
    }
    cart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryInventory, MemoryNotifier, MemoryStore};
    use crate::notify::NoticeLevel;
    use storefront_core::{Money, CART_STORAGE_KEY};

    struct Fixture {
        inventory: Arc<MemoryInventory>,
        store: Arc<MemoryStore>,
        notifier: Arc<MemoryNotifier>,
        manager: CartManager,
    }

    fn shoe(id: ProductId) -> Product {
        Product::new(
            id,
            format!("Tênis {}", id),
            Money::from_cents(10_000 + id as i64),
            format!("{}.jpg", id),
        )
    }

    fn fixture_with_store(store: MemoryStore) -> Fixture {
        let inventory = Arc::new(
            MemoryInventory::new()
                .with_product(shoe(1), 10)
                .with_product(shoe(2), 1)
                .with_product(shoe(3), 0),
        );
        let store = Arc::new(store);
        let notifier = Arc::new(MemoryNotifier::new());

        let manager = CartManager::load(
            CartConfig::default(),
            CartDeps {
                stock: inventory.clone(),
                catalog: inventory.clone(),
                store: store.clone(),
                notifier: notifier.clone(),
            },
        );

        Fixture {
            inventory,
            store,
            notifier,
            manager,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_store(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_add_new_product_inserts_one_unit() {
        let f = fixture();

        f.manager.add_product(1).await.unwrap();

        let cart = f.manager.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).unwrap(), &shoe(1).with_amount(1));
        assert_eq!(f.inventory.catalog_lookups(), 1);
        assert!(f.notifier.received().is_empty());
    }

    #[tokio::test]
    async fn test_add_existing_product_reuses_details() {
        let f = fixture();

        f.manager.add_product(1).await.unwrap();
        f.manager.add_product(1).await.unwrap();

        assert_eq!(f.manager.cart().len(), 1);
        assert_eq!(f.manager.cart().amount_of(1), 2);
        assert_eq!(f.inventory.catalog_lookups(), 1);
        assert_eq!(f.inventory.stock_lookups(), 2);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_warns() {
        let f = fixture();
        f.manager.add_product(2).await.unwrap();

        let err = f.manager.add_product(2).await.unwrap_err();

        assert!(matches!(
            err,
            CartError::StockExceeded {
                product_id: 2,
                requested: 2,
                available: 1
            }
        ));
        assert_eq!(f.manager.cart().amount_of(2), 1);
        let notices = f.notifier.received();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn test_add_out_of_stock_skips_catalog() {
        let f = fixture();

        let err = f.manager.add_product(3).await.unwrap_err();

        assert!(err.is_stock_exceeded());
        assert_eq!(f.inventory.catalog_lookups(), 0);
        assert!(f.manager.cart().is_empty());
        assert_eq!(f.store.writes(), 0);
    }

    #[tokio::test]
    async fn test_add_without_stock_record_fails() {
        let f = fixture();

        let err = f.manager.add_product(42).await.unwrap_err();

        assert!(matches!(err, CartError::StockNotFound(42)));
        let notices = f.notifier.received();
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Error adding product");
    }

    #[tokio::test]
    async fn test_add_with_stock_but_no_catalog_entry_fails() {
        let f = fixture();
        f.inventory.set_stock(50, 5);

        let err = f.manager.add_product(50).await.unwrap_err();

        assert!(matches!(err, CartError::ProductNotFound(50)));
        assert!(f.manager.cart().is_empty());
    }

    fn manager_selling(product: Product, available: i64) -> (CartManager, Arc<MemoryNotifier>) {
        let inventory = Arc::new(MemoryInventory::new().with_product(product, available));
        let notifier = Arc::new(MemoryNotifier::new());
        let manager = CartManager::load(
            CartConfig::default(),
            CartDeps {
                stock: inventory.clone(),
                catalog: inventory,
                store: Arc::new(MemoryStore::new()),
                notifier: notifier.clone(),
            },
        );
        (manager, notifier)
    }

    #[tokio::test]
    async fn test_add_accepts_any_display_fields() {
        let (manager, notifier) =
            manager_selling(Product::new(9, "", Money::from_cents(100), "x"), 5);

        manager.add_product(9).await.unwrap();

        let entry = manager.cart().get(9).cloned().unwrap();
        assert_eq!(entry.title, "");
        assert_eq!(entry.amount, 1);
        assert!(notifier.received().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_negative_catalog_price() {
        let (manager, notifier) =
            manager_selling(Product::new(8, "Vale", Money::from_cents(-100), "x"), 5);

        let err = manager.add_product(8).await.unwrap_err();

        assert!(matches!(err, CartError::InvalidProduct(_)));
        assert!(manager.cart().is_empty());
        assert_eq!(notifier.received()[0].message, "Error adding product");
    }

    #[tokio::test]
    async fn test_add_when_offline_fails() {
        let f = fixture();
        f.inventory.set_offline(true);

        let err = f.manager.add_product(1).await.unwrap_err();

        assert!(matches!(err, CartError::Lookup(LookupError::Unavailable(_))));
        assert!(f.manager.cart().is_empty());
    }

    #[tokio::test]
    async fn test_remove_present_product() {
        let f = fixture();
        f.manager.add_product(1).await.unwrap();
        f.manager.add_product(2).await.unwrap();

        f.manager.remove_product(1).await.unwrap();

        let cart = f.manager.cart();
        assert_eq!(cart.len(), 1);
        assert!(cart.contains(2));
        let stored = f.store.get(CART_STORAGE_KEY).unwrap();
        assert_eq!(stored, serde_json::to_string(&cart).unwrap());
    }

    #[tokio::test]
    async fn test_remove_absent_product_fails() {
        let f = fixture();
        f.manager.add_product(1).await.unwrap();
        let writes = f.store.writes();

        let err = f.manager.remove_product(9).await.unwrap_err();

        assert!(matches!(err, CartError::NotInCart(9)));
        assert_eq!(f.manager.cart().len(), 1);
        assert_eq!(f.store.writes(), writes);
        assert_eq!(f.notifier.received()[0].message, "Error removing product");
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_amount_before_lookup() {
        let f = fixture();
        f.manager.add_product(1).await.unwrap();
        let lookups = f.inventory.stock_lookups();

        for amount in [0, -1] {
            let err = f
                .manager
                .update_product_amount(UpdateProductAmount::new(1, amount))
                .await
                .unwrap_err();
            assert!(matches!(err, CartError::InvalidAmount(a) if a == amount));
        }

        assert_eq!(f.inventory.stock_lookups(), lookups);
        assert_eq!(f.manager.cart().amount_of(1), 1);
    }

    #[tokio::test]
    async fn test_update_sets_exact_amount() {
        let f = fixture();
        f.manager.add_product(1).await.unwrap();

        f.manager
            .update_product_amount(UpdateProductAmount::new(1, 7))
            .await
            .unwrap();

        let entry = f.manager.cart().get(1).cloned().unwrap();
        assert_eq!(entry, shoe(1).with_amount(7));
    }

    #[tokio::test]
    async fn test_update_beyond_stock_warns() {
        let f = fixture();
        f.manager.add_product(1).await.unwrap();

        let err = f
            .manager
            .update_product_amount(UpdateProductAmount::new(1, 11))
            .await
            .unwrap_err();

        assert!(err.is_stock_exceeded());
        assert_eq!(f.manager.cart().amount_of(1), 1);
        assert_eq!(f.notifier.received()[0].level, NoticeLevel::Warning);
    }

    #[tokio::test]
    async fn test_update_absent_product_fails() {
        let f = fixture();

        let err = f
            .manager
            .update_product_amount(UpdateProductAmount::new(1, 2))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::NotInCart(1)));
        assert_eq!(f.notifier.received()[0].message, "Error updating product amount");
    }

    #[tokio::test]
    async fn test_update_without_stock_record_fails() {
        let f = fixture();
        f.manager.add_product(1).await.unwrap();
        f.inventory.remove_stock(1);

        let err = f
            .manager
            .update_product_amount(UpdateProductAmount::new(1, 2))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::StockNotFound(1)));
        assert_eq!(f.manager.cart().amount_of(1), 1);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cart_unchanged() {
        let f = fixture();
        f.manager.add_product(1).await.unwrap();
        f.store.set_read_only(true);

        let err = f.manager.add_product(1).await.unwrap_err();

        assert!(matches!(err, CartError::Storage(_)));
        assert_eq!(f.manager.cart().amount_of(1), 1);
        assert_eq!(f.notifier.received()[0].message, "Error adding product");
    }

    #[tokio::test]
    async fn test_subscribers_see_commits() {
        let f = fixture();
        let mut rx = f.manager.subscribe();

        f.manager.add_product(1).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().amount_of(1), 1);

        // Refusals publish nothing.
        let _ = f.manager.remove_product(9).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_load_restores_persisted_cart() {
        let first = fixture();
        first.manager.add_product(1).await.unwrap();
        first.manager.add_product(2).await.unwrap();
        let raw = first.store.get(CART_STORAGE_KEY).unwrap();

        let second = fixture_with_store(MemoryStore::with_entry(CART_STORAGE_KEY, raw));

        assert_eq!(second.manager.cart(), first.manager.cart());
    }

    #[tokio::test]
    async fn test_load_corrupt_cart_starts_empty() {
        let f = fixture_with_store(MemoryStore::with_entry(CART_STORAGE_KEY, "{not json"));
        assert!(f.manager.cart().is_empty());
    }

    #[tokio::test]
    async fn test_load_decimal_price_cart() {
        let raw = r#"[{"id":1,"title":"Tênis","price":179.9,"image":"a.jpg","amount":2}]"#;

        let f = fixture_with_store(MemoryStore::with_entry(CART_STORAGE_KEY, raw));

        let cart = f.manager.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).unwrap().price, Money::from_cents(17990));
        assert_eq!(f.manager.totals().total, Money::from_cents(35980));

        // Further changes keep writing prices in the same decimal form.
        f.manager.add_product(1).await.unwrap();
        let stored = f.store.get(CART_STORAGE_KEY).unwrap();
        assert!(stored.contains(r#""price":179.9"#));
    }

    #[tokio::test]
    async fn test_totals_of_huge_stored_amounts_saturate() {
        let raw = serde_json::to_string(&vec![
            shoe(1).with_amount(i64::MAX),
            shoe(2).with_amount(i64::MAX),
        ])
        .unwrap();

        let f = fixture_with_store(MemoryStore::with_entry(CART_STORAGE_KEY, raw));
        assert_eq!(f.manager.cart().len(), 2);

        let totals = f.manager.totals();
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, i64::MAX);
        assert_eq!(totals.total, Money::from_cents(i64::MAX));
    }

    #[tokio::test]
    async fn test_load_drops_invalid_entries() {
        let raw = serde_json::to_string(&vec![
            shoe(1).with_amount(2),
            shoe(2).with_amount(0),
            shoe(1).with_amount(4),
        ])
        .unwrap();

        let f = fixture_with_store(MemoryStore::with_entry(CART_STORAGE_KEY, raw));

        let cart = f.manager.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.amount_of(1), 2);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_serialised() {
        let f = fixture();
        let manager = Arc::new(f.manager);

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.add_product(1).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(manager.cart().amount_of(1), 5);
        assert_eq!(f.inventory.catalog_lookups(), 1);
    }
}
