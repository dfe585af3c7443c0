//! Product catalog source.
//!
//! The catalog is a JSON array of products on disk. It is re-read when the
//! cached copy expires, so edits to the file show up without a restart.
//! Parsed catalogs are cached in memory via `moka`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};
use verto_core::Product;

const CACHE_KEY: &str = "products";

/// Errors loading the catalog file.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// File-backed, cached product catalog.
#[derive(Clone)]
pub struct CatalogStore {
    path: PathBuf,
    cache: Option<Cache<String, Arc<Vec<Product>>>>,
}

impl CatalogStore {
    /// Serve products from `path`, caching parsed results for `ttl`.
    /// A zero `ttl` reads the file on every request.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        let cache = (!ttl.is_zero()).then(|| Cache::builder().max_capacity(1).time_to_live(ttl).build());

        Self {
            path: path.into(),
            cache,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All products.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, CatalogLoadError> {
        if let Some(cache) = &self.cache
            && let Some(products) = cache.get(CACHE_KEY).await
        {
            debug!("Cache hit for catalog");
            return Ok(products);
        }

        let products = Arc::new(load(&self.path).await?);

        if let Some(cache) = &self.cache {
            cache
                .insert(CACHE_KEY.to_string(), Arc::clone(&products))
                .await;
        }

        Ok(products)
    }
}

async fn load(path: &Path) -> Result<Vec<Product>, CatalogLoadError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let products: Vec<Product> = serde_json::from_str(&raw)?;
    validate(&products)?;
    debug!(count = products.len(), "Catalog loaded from disk");
    Ok(products)
}

/// Ids must be unique and prices non-negative.
fn validate(products: &[Product]) -> Result<(), CatalogLoadError> {
    let mut seen = HashSet::with_capacity(products.len());
    for product in products {
        if !seen.insert(product.id) {
            return Err(CatalogLoadError::Invalid(format!(
                "duplicate product id {}",
                product.id
            )));
        }
        if product.price.is_negative() {
            return Err(CatalogLoadError::Invalid(format!(
                "product {} has a negative price",
                product.id
            )));
        }
    }
    Ok(())
}
