//! Cart error type.
//!
//! Catalog and checkout failures are terminal for the single operation that
//! hit them: the cart state is left as it was and the message is handed back
//! to the caller for display. Storage failures never surface here; the cart
//! logs and absorbs them.

use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors returned by cart operations that talk to the catalog service.
#[derive(Debug, Error)]
pub enum CartError {
    /// The catalog service could not be reached or refused the request.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Checkout was requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A checkout submission is already outstanding.
    #[error("Checkout already in progress")]
    CheckoutInProgress,
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
