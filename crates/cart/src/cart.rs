//! The shopping cart context object.
//!
//! [`ShoppingCart`] owns the cart lines, the catalog snapshot and the
//! ephemeral UI flags. Each line mutation runs under one lock in this order:
//! change the lines, rewrite the persisted slot, take a snapshot. Listeners
//! are then called with that snapshot after the lock is released.
//!
//! Per-line state machine:
//!
//! ```text
//! ABSENT        --increase--> PRESENT(1)
//! PRESENT(n)    --increase--> PRESENT(n+1)
//! PRESENT(1)    --decrease--> ABSENT
//! PRESENT(n>1)  --decrease--> PRESENT(n-1)
//! PRESENT(n)    --remove----> ABSENT
//! ```

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};
use verto_core::{CartLine, Price, Product, ProductId, validate_lines};

use crate::catalog::{CatalogApi, CatalogClient};
use crate::config::CartConfig;
use crate::error::Result;
use crate::storage::{CartStorage, FileStorage, StorageError};
use crate::subscription::{Listeners, Subscription};
use crate::view::{self, CartItemView, CartSnapshot};

/// Default time a successful checkout stays visible before the cart resets.
pub const DEFAULT_CHECKOUT_RESET_DELAY: Duration = Duration::from_secs(3);

/// Client-side shopping cart.
///
/// Cheaply cloneable via `Arc`; clones share one cart. The catalog client is
/// a type parameter so tests can substitute their own [`CatalogApi`].
pub struct ShoppingCart<C = CatalogClient> {
    inner: Arc<ShoppingCartInner<C>>,
}

struct ShoppingCartInner<C> {
    state: Mutex<CartState>,
    storage: Box<dyn CartStorage>,
    catalog: C,
    listeners: Arc<Listeners>,
    checkout_reset_delay: Duration,
}

#[derive(Debug, Default)]
pub(crate) struct CartState {
    pub(crate) lines: Vec<CartLine>,
    pub(crate) products: Vec<Product>,
    pub(crate) drawer_open: bool,
    pub(crate) loading: bool,
    pub(crate) checking_out: bool,
    pub(crate) catalog_error: Option<String>,
}

impl CartState {
    pub(crate) fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            total_quantity: view::total_quantity(&self.lines),
            total_price: view::total_price(&self.lines, &self.products),
            drawer_open: self.drawer_open,
            loading: self.loading,
            checking_out: self.checking_out,
            catalog_error: self.catalog_error.clone(),
        }
    }
}

impl<C> Clone for ShoppingCart<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ShoppingCart<CatalogClient> {
    /// Build a cart persisted under `config.cart_dir` that talks to the
    /// catalog service at `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog URL is invalid.
    pub fn from_config(config: &CartConfig) -> Result<Self> {
        let catalog = CatalogClient::new(&config.api_url)?;
        Ok(Self::with_checkout_reset_delay(
            FileStorage::in_dir(&config.cart_dir),
            catalog,
            config.checkout_reset_delay,
        ))
    }
}

impl<C> ShoppingCart<C> {
    /// Create a cart, restoring any lines persisted in `storage`.
    ///
    /// A missing record starts an empty cart. A corrupt record is deleted and
    /// also starts an empty cart; construction never fails.
    pub fn new(storage: impl CartStorage + 'static, catalog: C) -> Self {
        Self::with_checkout_reset_delay(storage, catalog, DEFAULT_CHECKOUT_RESET_DELAY)
    }

    /// Like [`ShoppingCart::new`] with a custom post-checkout reset delay.
    pub fn with_checkout_reset_delay(
        storage: impl CartStorage + 'static,
        catalog: C,
        checkout_reset_delay: Duration,
    ) -> Self {
        let lines = restore(&storage);

        Self {
            inner: Arc::new(ShoppingCartInner {
                state: Mutex::new(CartState {
                    lines,
                    ..CartState::default()
                }),
                storage: Box::new(storage),
                catalog,
                listeners: Arc::new(Listeners::default()),
                checkout_reset_delay,
            }),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Quantity of `id` in the cart, or 0.
    #[must_use]
    pub fn quantity(&self, id: ProductId) -> u32 {
        self.lock()
            .lines
            .iter()
            .find(|line| line.id == id)
            .map_or(0, CartLine::quantity)
    }

    /// Cart lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().lines.clone()
    }

    /// The current catalog snapshot.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    /// Look up a product in the catalog snapshot.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<Product> {
        view::find_product(&self.lock().products, id).cloned()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        view::total_quantity(&self.lock().lines)
    }

    /// Sum of line totals; lines missing from the catalog count as 0.
    #[must_use]
    pub fn total_price(&self) -> Price {
        let state = self.lock();
        view::total_price(&state.lines, &state.products)
    }

    /// Lines joined with their catalog entries.
    #[must_use]
    pub fn items(&self) -> Vec<CartItemView> {
        let state = self.lock();
        state
            .lines
            .iter()
            .map(|line| CartItemView::new(line, &state.products))
            .collect()
    }

    #[must_use]
    pub fn is_drawer_open(&self) -> bool {
        self.lock().drawer_open
    }

    /// Whether a catalog fetch is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Whether a checkout submission is in flight.
    #[must_use]
    pub fn is_checking_out(&self) -> bool {
        self.lock().checking_out
    }

    /// Message from the last failed catalog fetch, cleared by the next fetch.
    #[must_use]
    pub fn catalog_error(&self) -> Option<String> {
        self.lock().catalog_error.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.lock().snapshot()
    }

    /// Register a listener called after every state change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        self.inner.listeners.add(Arc::new(listener))
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Add one unit of `id`, creating the line if needed.
    ///
    /// No upper bound is enforced; the quantity saturates at `u32::MAX`.
    pub fn increase(&self, id: ProductId) {
        self.edit_lines(|lines| {
            match lines.iter_mut().find(|line| line.id == id) {
                Some(line) => line.quantity = line.quantity.saturating_add(1),
                None => lines.push(CartLine::single(id)),
            }
            true
        });
        debug!(product_id = %id, "Increased cart quantity");
    }

    /// Take one unit of `id` away; the last unit removes the line.
    pub fn decrease(&self, id: ProductId) {
        let changed = self.edit_lines(|lines| {
            let Some(line) = lines.iter_mut().find(|line| line.id == id) else {
                return false;
            };
            if let Some(quantity) = NonZeroU32::new(line.quantity.get() - 1) {
                line.quantity = quantity;
            } else {
                lines.retain(|line| line.id != id);
            }
            true
        });
        if changed {
            debug!(product_id = %id, "Decreased cart quantity");
        }
    }

    /// Drop the line for `id` whatever its quantity.
    pub fn remove(&self, id: ProductId) {
        let changed = self.edit_lines(|lines| {
            let before = lines.len();
            lines.retain(|line| line.id != id);
            lines.len() != before
        });
        if changed {
            debug!(product_id = %id, "Removed cart line");
        }
    }

    /// Empty the cart and erase the persisted record.
    pub fn clear(&self) {
        self.edit_lines(|lines| {
            lines.clear();
            true
        });
        info!("Cart cleared");
    }

    pub fn open_drawer(&self) {
        self.update(|state| state.drawer_open = true);
    }

    pub fn close_drawer(&self) {
        self.update(|state| state.drawer_open = false);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    pub(crate) fn lock(&self) -> MutexGuard<'_, CartState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn catalog(&self) -> &C {
        &self.inner.catalog
    }

    pub(crate) fn checkout_reset_delay(&self) -> Duration {
        self.inner.checkout_reset_delay
    }

    pub(crate) fn notify(&self, snapshot: &CartSnapshot) {
        self.inner.listeners.notify(snapshot);
    }

    /// Apply an ephemeral state change and notify listeners.
    pub(crate) fn update(&self, change: impl FnOnce(&mut CartState)) {
        let snapshot = {
            let mut state = self.lock();
            change(&mut state);
            state.snapshot()
        };
        self.notify(&snapshot);
    }

    /// Apply `change` to the lines. When it reports a change, rewrite the
    /// persisted slot and notify listeners. Returns whether anything changed.
    fn edit_lines(&self, change: impl FnOnce(&mut Vec<CartLine>) -> bool) -> bool {
        let snapshot = {
            let mut state = self.lock();
            if !change(&mut state.lines) {
                return false;
            }
            self.persist(&state.lines);
            state.snapshot()
        };
        self.notify(&snapshot);
        true
    }

    /// Rewrite the persisted slot; an empty cart deletes it.
    fn persist(&self, lines: &[CartLine]) {
        let result = if lines.is_empty() {
            self.inner.storage.remove()
        } else {
            serde_json::to_string(lines)
                .map_err(StorageError::from)
                .and_then(|json| self.inner.storage.save(&json))
        };

        match result {
            Ok(()) => debug!(lines = lines.len(), "Cart persisted"),
            Err(e) => warn!(error = %e, "Failed to persist cart"),
        }
    }
}

impl<C: CatalogApi> ShoppingCart<C> {
    /// Fetch the catalog and replace the product snapshot wholesale.
    ///
    /// On failure the previous snapshot is kept and [`catalog_error`] is set.
    /// Overlapping calls are not coalesced: whichever response arrives last
    /// wins.
    ///
    /// [`catalog_error`]: ShoppingCart::catalog_error
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog service is unreachable or rejects the
    /// request.
    #[instrument(skip(self))]
    pub async fn fetch_catalog(&self) -> Result<()> {
        self.update(|state| {
            state.loading = true;
            state.catalog_error = None;
        });

        match self.catalog().products().await {
            Ok(products) => {
                info!(count = products.len(), "Catalog loaded");
                self.update(|state| {
                    state.products = products;
                    state.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch catalog");
                let message = e.to_string();
                self.update(|state| {
                    state.catalog_error = Some(message);
                    state.loading = false;
                });
                Err(e.into())
            }
        }
    }

    /// Re-fetch the catalog on demand.
    ///
    /// # Errors
    ///
    /// See [`ShoppingCart::fetch_catalog`].
    pub async fn refresh_catalog(&self) -> Result<()> {
        self.fetch_catalog().await
    }
}

/// Read the persisted lines, discarding anything malformed.
fn restore(storage: &dyn CartStorage) -> Vec<CartLine> {
    let raw = match storage.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "Unreadable persisted cart, starting empty");
            discard(storage);
            return Vec::new();
        }
    };

    let parsed = serde_json::from_str::<Vec<CartLine>>(&raw)
        .map_err(|e| e.to_string())
        .and_then(|lines| validate_lines(&lines).map(|()| lines).map_err(|e| e.to_string()));

    match parsed {
        Ok(lines) if lines.is_empty() => {
            discard(storage);
            lines
        }
        Ok(lines) => {
            info!(lines = lines.len(), "Cart restored from storage");
            lines
        }
        Err(reason) => {
            warn!(%reason, "Discarding malformed persisted cart");
            discard(storage);
            Vec::new()
        }
    }
}

fn discard(storage: &dyn CartStorage) {
    if let Err(e) = storage.remove() {
        warn!(error = %e, "Failed to delete persisted cart");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::catalog::CatalogError;
    use crate::error::CartError;
    use crate::storage::MemoryStorage;
    use crate::testing::{FailingStorage, StubCatalog, product};

    fn id(n: i64) -> ProductId {
        ProductId::new(n)
    }

    fn cart_with(storage: &MemoryStorage) -> ShoppingCart<StubCatalog> {
        ShoppingCart::new(storage.clone(), StubCatalog::default())
    }

    fn persisted(storage: &MemoryStorage) -> Option<Vec<CartLine>> {
        storage
            .value()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[test]
    fn test_quantity_of_absent_product_is_zero() {
        let cart = cart_with(&MemoryStorage::new());
        assert_eq!(cart.quantity(id(1)), 0);
    }

    #[test]
    fn test_increase_counts_calls() {
        let cart = cart_with(&MemoryStorage::new());
        for _ in 0..5 {
            cart.increase(id(4));
        }
        assert_eq!(cart.quantity(id(4)), 5);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_increase_scenario_totals() {
        let cart = cart_with(&MemoryStorage::new());
        cart.increase(id(7));
        cart.increase(id(7));
        cart.increase(id(3));

        assert_eq!(cart.total_quantity(), 3);
        assert_eq!(cart.quantity(id(7)), 2);
        assert_eq!(cart.quantity(id(3)), 1);

        let order: Vec<ProductId> = cart.lines().iter().map(|line| line.id).collect();
        assert_eq!(order, vec![id(7), id(3)]);
    }

    #[test]
    fn test_decrease_last_unit_removes_line() {
        let storage = MemoryStorage::new();
        let cart = cart_with(&storage);
        cart.increase(id(7));
        cart.increase(id(7));

        cart.decrease(id(7));
        assert_eq!(cart.quantity(id(7)), 1);

        cart.decrease(id(7));
        assert_eq!(cart.quantity(id(7)), 0);
        assert!(cart.lines().is_empty());
        assert!(storage.value().is_none());
    }

    #[test]
    fn test_decrease_absent_is_noop() {
        let storage = MemoryStorage::new();
        let cart = cart_with(&storage);
        cart.increase(id(1));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _subscription = cart.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cart.decrease(id(2));
        assert_eq!(cart.lines(), vec![CartLine::single(id(1))]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let cart = cart_with(&MemoryStorage::new());
        cart.increase(id(1));
        cart.increase(id(1));
        cart.increase(id(2));

        cart.remove(id(1));
        let after_first = cart.lines();
        cart.remove(id(1));

        assert_eq!(cart.lines(), after_first);
        assert_eq!(after_first, vec![CartLine::single(id(2))]);
    }

    #[test]
    fn test_clear_empties_and_deletes_record() {
        let storage = MemoryStorage::new();
        let cart = cart_with(&storage);
        cart.increase(id(1));
        cart.increase(id(2));
        assert!(storage.value().is_some());

        cart.clear();
        assert!(cart.lines().is_empty());
        assert!(storage.value().is_none());

        // Clearing an empty cart still leaves no record behind
        storage.save("[]").unwrap();
        cart.clear();
        assert!(storage.value().is_none());
    }

    #[test]
    fn test_every_mutation_rewrites_storage() {
        let storage = MemoryStorage::new();
        let cart = cart_with(&storage);

        cart.increase(id(5));
        assert_eq!(persisted(&storage), Some(vec![CartLine::single(id(5))]));

        cart.increase(id(5));
        assert_eq!(persisted(&storage).unwrap()[0].quantity(), 2);

        cart.remove(id(5));
        assert_eq!(persisted(&storage), None);
    }

    #[test]
    fn test_round_trip_through_storage() {
        let storage = MemoryStorage::new();
        let cart = cart_with(&storage);
        cart.increase(id(9));
        cart.increase(id(2));
        cart.increase(id(9));
        cart.increase(id(4));
        let expected = cart.lines();
        drop(cart);

        let restored = cart_with(&storage);
        assert_eq!(restored.lines(), expected);
    }

    #[test]
    fn test_corrupt_record_starts_empty_and_is_deleted() {
        for raw in [
            "not json",
            r#"{"id":1,"quantity":1}"#,
            r#"[{"id":1,"quantity":0}]"#,
            r#"[{"id":1}]"#,
            r#"[{"id":1,"quantity":1},{"id":1,"quantity":2}]"#,
        ] {
            let storage = MemoryStorage::with_value(raw);
            let cart = cart_with(&storage);
            assert!(cart.lines().is_empty(), "record {raw:?} should be discarded");
            assert!(storage.value().is_none(), "record {raw:?} should be deleted");
        }
    }

    #[test]
    fn test_empty_record_is_deleted() {
        let storage = MemoryStorage::with_value("[]");
        let cart = cart_with(&storage);
        assert!(cart.lines().is_empty());
        assert!(storage.value().is_none());
    }

    #[test]
    fn test_total_price_uses_catalog_prices() {
        let cart = cart_with(&MemoryStorage::new());
        cart.increase(id(7));
        cart.increase(id(7));
        cart.lock().products = vec![product(7, 500)];
        assert_eq!(cart.total_price(), Price::from_units(1000));

        cart.lock().products = vec![product(8, 500)];
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[test]
    fn test_drawer_flag_is_not_persisted() {
        let storage = MemoryStorage::new();
        let cart = cart_with(&storage);

        cart.open_drawer();
        assert!(cart.is_drawer_open());
        assert!(storage.value().is_none());

        cart.close_drawer();
        assert!(!cart.is_drawer_open());
    }

    #[test]
    fn test_listeners_see_committed_state() {
        let storage = MemoryStorage::new();
        let cart = cart_with(&storage);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let observed_storage = storage.clone();
        let subscription = cart.subscribe(move |snapshot| {
            // Persistence has already happened when listeners run
            let stored = observed_storage.value().is_some();
            sink.lock()
                .unwrap()
                .push((snapshot.total_quantity, stored));
        });

        cart.increase(id(1));
        cart.increase(id(1));
        cart.remove(id(1));
        subscription.unsubscribe();
        cart.increase(id(1));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(1, true), (2, true), (0, false)]
        );
    }

    #[test]
    fn test_clones_share_state() {
        let cart = cart_with(&MemoryStorage::new());
        let other = cart.clone();
        other.increase(id(3));
        assert_eq!(cart.quantity(id(3)), 1);
    }

    #[tokio::test]
    async fn test_fetch_catalog_replaces_products() {
        let catalog = StubCatalog::default();
        catalog.queue_products(Ok(vec![product(1, 100), product(2, 200)]));
        catalog.queue_products(Ok(vec![product(3, 300)]));
        let cart = ShoppingCart::new(MemoryStorage::new(), catalog);

        cart.fetch_catalog().await.unwrap();
        assert_eq!(cart.products().len(), 2);
        assert!(!cart.is_loading());

        cart.refresh_catalog().await.unwrap();
        let ids: Vec<ProductId> = cart.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![id(3)]);
        assert_eq!(cart.product(id(3)).unwrap().price, Price::from_units(300));
    }

    #[tokio::test]
    async fn test_fetch_catalog_failure_keeps_previous_state() {
        let catalog = StubCatalog::default();
        catalog.queue_products(Ok(vec![product(7, 500)]));
        catalog.queue_products(Err(CatalogError::Rejected("Failed to fetch products".to_string())));
        let cart = ShoppingCart::new(MemoryStorage::new(), catalog);

        cart.fetch_catalog().await.unwrap();
        cart.increase(id(7));
        cart.increase(id(7));

        let err = cart.fetch_catalog().await.unwrap_err();
        assert!(matches!(err, CartError::Catalog(_)));
        assert_eq!(cart.catalog_error().as_deref(), Some("Failed to fetch products"));
        assert_eq!(cart.products(), vec![product(7, 500)]);
        assert_eq!(cart.quantity(id(7)), 2);
        assert!(!cart.is_loading());
    }

    #[tokio::test]
    async fn test_successful_fetch_clears_error() {
        let catalog = StubCatalog::default();
        catalog.queue_products(Err(CatalogError::Status {
            status: 500,
            message: None,
        }));
        catalog.queue_products(Ok(Vec::new()));
        let cart = ShoppingCart::new(MemoryStorage::new(), catalog);

        assert!(cart.fetch_catalog().await.is_err());
        assert_eq!(cart.catalog_error().as_deref(), Some("HTTP error! status: 500"));

        cart.fetch_catalog().await.unwrap();
        assert_eq!(cart.catalog_error(), None);
    }

    #[test]
    fn test_storage_write_failure_keeps_in_memory_state() {
        let storage = FailingStorage::default();
        let cart = ShoppingCart::new(storage.clone(), StubCatalog::default());
        let notified = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&notified);
        let _subscription = cart.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        cart.increase(id(4));
        cart.increase(id(4));
        cart.increase(id(9));
        cart.decrease(id(9));

        assert_eq!(cart.quantity(id(4)), 2);
        assert_eq!(cart.quantity(id(9)), 0);
        assert_eq!(notified.load(Ordering::SeqCst), 4);
        assert_eq!(storage.save_attempts(), 4);
    }

    #[test]
    fn test_unreadable_record_starts_empty() {
        let storage = FailingStorage::default();
        let cart = ShoppingCart::new(storage.clone(), StubCatalog::default());

        assert!(cart.lines().is_empty());
        // The unreadable record is dropped at startup
        assert_eq!(storage.remove_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_fetches_last_response_wins() {
        let catalog = StubCatalog::default();
        catalog.queue_products_after(Duration::from_secs(3), Ok(vec![product(1, 100)]));
        catalog.queue_products_after(Duration::from_secs(1), Ok(vec![product(2, 200)]));
        let cart = ShoppingCart::new(MemoryStorage::new(), catalog);

        let slow = tokio::spawn({
            let cart = cart.clone();
            async move { cart.fetch_catalog().await }
        });
        tokio::task::yield_now().await;
        let fast = tokio::spawn({
            let cart = cart.clone();
            async move { cart.fetch_catalog().await }
        });

        fast.await.unwrap().unwrap();
        assert_eq!(cart.products(), vec![product(2, 200)]);

        // The earlier request resolves later and overwrites the newer catalog
        slow.await.unwrap().unwrap();
        assert_eq!(cart.products(), vec![product(1, 100)]);
        assert!(!cart.is_loading());
    }
}
