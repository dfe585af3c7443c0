//! Catalog browsing commands.

use verto_cart::{CatalogClient, ShoppingCart};
use verto_core::ProductId;

use super::{CommandError, emit};
use crate::render;

/// `verto products`
pub async fn list(cart: &ShoppingCart) -> Result<(), CommandError> {
    cart.fetch_catalog().await?;
    emit(&render::product_list(&cart.products()));
    Ok(())
}

/// `verto product <id>`
pub async fn show(cart: &ShoppingCart, id: ProductId) -> Result<(), CommandError> {
    cart.fetch_catalog().await?;
    let product = cart.product(id).ok_or(CommandError::UnknownProduct(id))?;

    emit(&render::product_detail(&product));
    let in_cart = cart.quantity(id);
    if in_cart > 0 {
        emit(&format!("\nIn cart: {in_cart}\n"));
    }
    Ok(())
}

/// `verto health`
pub async fn health(client: &CatalogClient) -> Result<(), CommandError> {
    let response = client.health().await?;
    emit(&format!(
        "{} {} ({})\n",
        client.base_url(),
        response.message,
        response.timestamp.to_rfc3339()
    ));
    Ok(())
}
