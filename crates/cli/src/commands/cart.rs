//! Cart editing commands.
//!
//! Line edits never need the catalog service. Prices are looked up only to
//! print the cart afterwards; when the service is down the cart is still
//! printed, with unpriced lines.

use tracing::warn;
use verto_cart::ShoppingCart;
use verto_core::ProductId;

use super::{CommandError, emit};
use crate::render;

/// `verto cart`
pub async fn show(cart: &ShoppingCart) {
    if !cart.lines().is_empty()
        && let Err(e) = cart.fetch_catalog().await
    {
        warn!(error = %e, "Showing cart without prices");
        emit(&format!("Prices unavailable: {e}\n\n"));
    }

    emit(&render::cart(&cart.items(), cart.total_quantity(), cart.total_price()));
}

/// `verto add <id>`
///
/// Only products present in the catalog can be added.
pub async fn add(cart: &ShoppingCart, id: ProductId) -> Result<(), CommandError> {
    cart.fetch_catalog().await?;
    if cart.product(id).is_none() {
        return Err(CommandError::UnknownProduct(id));
    }

    cart.increase(id);
    emit(&render::cart(&cart.items(), cart.total_quantity(), cart.total_price()));
    Ok(())
}

/// `verto decrease <id>`
pub async fn decrease(cart: &ShoppingCart, id: ProductId) {
    cart.decrease(id);
    show(cart).await;
}

/// `verto remove <id>`
pub async fn remove(cart: &ShoppingCart, id: ProductId) {
    cart.remove(id);
    show(cart).await;
}

/// `verto clear`
pub fn clear(cart: &ShoppingCart) {
    cart.clear();
    emit("Cart cleared.\n");
}
