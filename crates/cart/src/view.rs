//! Read-only views of the cart.
//!
//! Totals are derived on demand from the lines and the current catalog
//! snapshot; nothing here is stored.

use verto_core::{CartLine, Price, Product, ProductId};

/// Display name for a line whose product is missing from the catalog.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// State handed to subscribers after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub total_quantity: u64,
    pub total_price: Price,
    pub drawer_open: bool,
    pub loading: bool,
    pub checking_out: bool,
    pub catalog_error: Option<String>,
}

/// A cart line joined with its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub img_url: Option<String>,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
    /// False when the product id is not in the current catalog.
    pub resolved: bool,
}

impl CartItemView {
    /// Build the view for `line`, falling back to a placeholder when the
    /// product is unknown.
    #[must_use]
    pub fn new(line: &CartLine, products: &[Product]) -> Self {
        let product = find_product(products, line.id);
        let unit_price = product.map_or(Price::ZERO, |p| p.price);

        Self {
            id: line.id,
            name: product.map_or_else(|| UNKNOWN_PRODUCT_NAME.to_string(), |p| p.name.clone()),
            img_url: product.map(|p| p.img_url.clone()),
            quantity: line.quantity(),
            unit_price,
            line_total: unit_price.times(line.quantity()),
            resolved: product.is_some(),
        }
    }
}

pub(crate) fn find_product(products: &[Product], id: ProductId) -> Option<&Product> {
    products.iter().find(|p| p.id == id)
}

/// Sum of line quantities.
#[must_use]
pub fn total_quantity(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity())).sum()
}

/// Sum of quantity × unit price; unresolved products contribute nothing.
#[must_use]
pub fn total_price(lines: &[CartLine], products: &[Product]) -> Price {
    lines
        .iter()
        .map(|line| {
            find_product(products, line.id).map_or(Price::ZERO, |p| p.price.times(line.quantity()))
        })
        .sum()
}
