//! Test doubles shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use verto_core::api::CheckoutReceipt;
use verto_core::{CartLine, Price, Product, ProductId};

use crate::catalog::{CatalogApi, CatalogError};
use crate::storage::{CartStorage, StorageError};

pub fn product(id: i64, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Phone {id}"),
        price: Price::from_units(price),
        img_url: format!("/imgs/{id}.jpg"),
        description: format!("Test phone {id}"),
        category: "Android".to_string(),
        storage: "128GB".to_string(),
        camera: "50MP".to_string(),
        battery: "5000mAh".to_string(),
    }
}

pub fn receipt(total: i64, item_count: usize) -> CheckoutReceipt {
    CheckoutReceipt {
        success: true,
        message: "Order placed successfully!".to_string(),
        order_id: "ORDER-1".to_string(),
        total_amount: Price::from_units(total),
        item_count,
    }
}

/// Catalog that replays queued responses in order.
#[derive(Default)]
pub struct StubCatalog {
    products: Mutex<VecDeque<(Option<Duration>, Result<Vec<Product>, CatalogError>)>>,
    checkouts: Mutex<VecDeque<Result<CheckoutReceipt, CatalogError>>>,
    submitted: Mutex<Vec<Vec<CartLine>>>,
    latency: Duration,
}

impl StubCatalog {
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn queue_products(&self, response: Result<Vec<Product>, CatalogError>) {
        self.products.lock().unwrap().push_back((None, response));
    }

    /// Queue a products response that takes `delay` instead of the stub's
    /// latency to arrive.
    pub fn queue_products_after(&self, delay: Duration, response: Result<Vec<Product>, CatalogError>) {
        self.products.lock().unwrap().push_back((Some(delay), response));
    }

    pub fn queue_checkout(&self, response: Result<CheckoutReceipt, CatalogError>) {
        self.checkouts.lock().unwrap().push_back(response);
    }

    pub fn submitted(&self) -> Vec<Vec<CartLine>> {
        self.submitted.lock().unwrap().clone()
    }
}

impl CatalogApi for StubCatalog {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        // Responses are claimed in call order, then delivered after their delay
        let next = self.products.lock().unwrap().pop_front();
        let (delay, response) = next.unwrap_or_else(|| {
            (None, Err(CatalogError::Rejected("no response queued".to_string())))
        });
        tokio::time::sleep(delay.unwrap_or(self.latency)).await;
        response
    }

    async fn checkout(&self, lines: &[CartLine]) -> Result<CheckoutReceipt, CatalogError> {
        self.submitted.lock().unwrap().push(lines.to_vec());
        tokio::time::sleep(self.latency).await;
        let next = self.checkouts.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(CatalogError::Rejected("no response queued".to_string())))
    }
}

/// Storage whose every operation fails, counting the attempts.
///
/// Clones share the counters.
#[derive(Clone, Default)]
pub struct FailingStorage {
    saves: Arc<AtomicUsize>,
    removes: Arc<AtomicUsize>,
}

impl FailingStorage {
    pub fn save_attempts(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn remove_attempts(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    fn unavailable() -> StorageError {
        io::Error::other("storage unavailable").into()
    }
}

impl CartStorage for FailingStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Err(Self::unavailable())
    }

    fn save(&self, _value: &str) -> Result<(), StorageError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Err(Self::unavailable())
    }

    fn remove(&self) -> Result<(), StorageError> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        Err(Self::unavailable())
    }
}
