//! HTTP route handlers for the catalog service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/products  - Full product listing
//! POST /api/checkout  - Price and acknowledge an order
//! GET  /api/health    - Liveness probe
//! ```

pub mod checkout;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the `/api` router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/checkout", post(checkout::place_order))
        .route("/health", get(health::health))
}
