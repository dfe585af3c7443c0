//! Subcommand implementations.
//!
//! Each command works on one [`verto_cart::ShoppingCart`] opened from the
//! environment and prints its result to stdout.

pub mod cart;
pub mod catalog;
pub mod checkout;

use thiserror::Error;
use verto_cart::{CartError, CatalogError, ConfigError};
use verto_core::ProductId;

/// Errors surfaced to the user by any subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("No product with id {0}")]
    UnknownProduct(ProductId),
}

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
fn emit(text: &str) {
    print!("{text}");
}
