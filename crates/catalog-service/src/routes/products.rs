//! Product listing.

use axum::{Json, extract::State};
use tracing::instrument;
use verto_core::api::ProductsResponse;

use crate::error::{AppError, Result};
use crate::state::AppState;

const FETCH_FAILED: &str = "Failed to fetch products";

/// Return the whole catalog.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<ProductsResponse>> {
    let products = state
        .catalog()
        .products()
        .await
        .map_err(AppError::catalog(FETCH_FAILED))?;

    Ok(Json(ProductsResponse::new(products.as_ref().clone())))
}
