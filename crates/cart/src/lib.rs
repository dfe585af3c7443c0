//! Verto Cart - client-side shopping cart.
//!
//! The cart is the single source of truth for what the current visitor
//! intends to buy. It owns the line items, a snapshot of the catalog fetched
//! from the catalog service, and the derived totals, and keeps a persisted
//! copy of the lines so a cart survives restarts.
//!
//! # Architecture
//!
//! - [`ShoppingCart`] is an explicitly constructed context object. Clone it
//!   to share one cart between the UI and background tasks; all clones see
//!   the same state.
//! - [`CartStorage`] is the persisted slot ([`FileStorage`] on disk,
//!   [`MemoryStorage`] in-process). Every line mutation rewrites it.
//! - [`CatalogApi`] is the seam to the catalog service; [`CatalogClient`]
//!   implements it over HTTP.
//! - [`ShoppingCart::subscribe`] registers listeners that run synchronously
//!   after each committed change.
//!
//! # Example
//!
//! ```rust,ignore
//! use verto_cart::{CartConfig, ShoppingCart};
//!
//! let config = CartConfig::from_env()?;
//! let cart = ShoppingCart::from_config(&config)?;
//!
//! cart.fetch_catalog().await?;
//! cart.increase(ProductId::new(7));
//! println!("{} items, {}", cart.total_quantity(), cart.total_price());
//!
//! let order = cart.checkout().await?;
//! order.settled().await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod storage;
pub mod subscription;
pub mod view;

#[cfg(test)]
mod testing;

pub use cart::{DEFAULT_CHECKOUT_RESET_DELAY, ShoppingCart};
pub use catalog::{CatalogApi, CatalogClient, CatalogError};
pub use checkout::PlacedOrder;
pub use config::{CartConfig, ConfigError};
pub use error::{CartError, Result};
pub use storage::{CART_STORAGE_KEY, CartStorage, FileStorage, MemoryStorage, StorageError};
pub use subscription::Subscription;
pub use view::{CartItemView, CartSnapshot, UNKNOWN_PRODUCT_NAME};
