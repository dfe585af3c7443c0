//! Plain-text rendering of catalog and cart data.

use std::fmt::Write;

use verto_cart::{CartItemView, UNKNOWN_PRODUCT_NAME};
use verto_core::Product;
use verto_core::api::CheckoutReceipt;

/// One line per product: id, name, price.
pub fn product_list(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products available.\n".to_string();
    }

    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "{:>4}  {:<32} {:>12}",
            product.id, product.name, product.price
        );
    }
    let _ = writeln!(out, "\n{} products", products.len());
    out
}

pub fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", product.name, product.id);
    let _ = writeln!(out, "{}", product.price);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", product.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "Category: {}", product.category);
    let _ = writeln!(out, "Storage:  {}", product.storage);
    let _ = writeln!(out, "Camera:   {}", product.camera);
    let _ = writeln!(out, "Battery:  {}", product.battery);
    out
}

/// The cart table followed by its totals.
pub fn cart(items: &[CartItemView], total_quantity: u64, total_price: verto_core::Price) -> String {
    if items.is_empty() {
        return "Your cart is empty.\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        let _ = writeln!(
            out,
            "{:>4}  {:<32} {:>3} x {:>12} = {:>12}",
            item.id, item.name, item.quantity, item.unit_price, item.line_total
        );
    }
    let _ = writeln!(out, "\nItems: {total_quantity}");
    let _ = writeln!(out, "Total: {total_price}");

    if items.iter().any(|item| !item.resolved) {
        let _ = writeln!(
            out,
            "\n\"{UNKNOWN_PRODUCT_NAME}\" lines are not in the current catalog and count as free."
        );
    }
    out
}

pub fn receipt(receipt: &CheckoutReceipt) -> String {
    let mut out = String::new();
    if !receipt.message.is_empty() {
        let _ = writeln!(out, "{}", receipt.message);
    }
    let _ = writeln!(out, "Order:  {}", receipt.order_id);
    let _ = writeln!(out, "Total:  {}", receipt.total_amount);
    let _ = writeln!(out, "Lines:  {}", receipt.item_count);
    out
}
