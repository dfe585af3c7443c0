//! Integration tests for Verto.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p verto-integration-tests
//! ```
//!
//! Each test starts its own catalog service on an ephemeral localhost port
//! and gets a private cart directory, so tests run in parallel without a
//! shared server.
//!
//! # Test Categories
//!
//! - `catalog_service` - HTTP contract of the service, driven with `reqwest`
//! - `cart_flow` - `ShoppingCart` + `CatalogClient` + `FileStorage` end to end

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use verto_catalog_service::{app, config::CatalogServiceConfig, state::AppState};

/// A running catalog service plus a scratch directory for cart files.
pub struct TestContext {
    pub addr: SocketAddr,
    pub cart_dir: PathBuf,
    server: JoinHandle<()>,
}

impl TestContext {
    /// Serve the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with_data(&bundled_catalog()).await
    }

    /// Serve the catalog file at `data_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start_with_data(data_path: &Path) -> std::io::Result<Self> {
        let data_path = data_path.display().to_string();
        let config = CatalogServiceConfig::from_lookup(|key| match key {
            "CATALOG_HOST" => Some("127.0.0.1".to_string()),
            "PORT" => Some("0".to_string()),
            "CATALOG_DATA_PATH" => Some(data_path.clone()),
            "CATALOG_CACHE_TTL_SECS" => Some("0".to_string()),
            _ => None,
        })
        .map_err(std::io::Error::other)?;

        let listener = TcpListener::bind(config.socket_addr()).await?;
        let addr = listener.local_addr()?;
        let router = app(AppState::new(config));

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let cart_dir = std::env::temp_dir().join(format!("verto-it-{}", uuid::Uuid::new_v4()));

        Ok(Self {
            addr,
            cart_dir,
            server,
        })
    }

    /// Base URL of the running service, e.g. `http://127.0.0.1:49152`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Absolute URL for `path` on the running service.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.server.abort();
        let _ = std::fs::remove_dir_all(&self.cart_dir);
    }
}

/// The product file shipped with the catalog service.
#[must_use]
pub fn bundled_catalog() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../catalog-service/data/items.json")
}

/// A base URL where nothing is listening.
///
/// # Errors
///
/// Returns an error if no local port can be bound.
pub async fn unused_base_url() -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}
