//! `verto checkout`

use verto_cart::ShoppingCart;

use super::{CommandError, emit};
use crate::render;

/// Place the order, then wait for the cart reset so the persisted cart is
/// empty when the process exits.
pub async fn run(cart: &ShoppingCart) -> Result<(), CommandError> {
    // Prices for the summary only; the service prices the order itself
    if let Err(e) = cart.fetch_catalog().await {
        tracing::debug!(error = %e, "Catalog unavailable before checkout");
    }
    emit(&render::cart(&cart.items(), cart.total_quantity(), cart.total_price()));

    let order = cart.checkout().await?;
    emit(&format!("\n{}", render::receipt(&order.receipt)));

    order.settled().await;
    if cart.lines().is_empty() {
        emit("\nCart cleared.\n");
    }

    Ok(())
}
