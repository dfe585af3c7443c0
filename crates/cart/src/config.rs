//! Cart client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VERTO_API_URL` - Catalog service base URL (default: `http://localhost:5000`)
//! - `VERTO_CART_DIR` - Directory holding the persisted cart (default: `.verto`)
//! - `VERTO_CHECKOUT_RESET_MS` - Delay before a checked-out cart is cleared (default: 3000)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_CART_DIR: &str = ".verto";
const DEFAULT_CHECKOUT_RESET_MS: &str = "3000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Catalog service base URL
    pub api_url: String,
    /// Directory for the persisted cart slot
    pub cart_dir: PathBuf,
    /// How long a successful checkout stays visible before the cart resets
    pub checkout_reset_delay: Duration,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let reset_ms = get("VERTO_CHECKOUT_RESET_MS", DEFAULT_CHECKOUT_RESET_MS)
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VERTO_CHECKOUT_RESET_MS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_url: get("VERTO_API_URL", DEFAULT_API_URL),
            cart_dir: PathBuf::from(get("VERTO_CART_DIR", DEFAULT_CART_DIR)),
            checkout_reset_delay: Duration::from_millis(reset_ms),
        })
    }
}
