//! Cart line items.
//!
//! A [`CartLine`] is the unit both persisted locally and submitted at
//! checkout: `{"id": <product id>, "quantity": <n>}`. The quantity is a
//! [`NonZeroU32`], so a zero-quantity line is unrepresentable and fails to
//! deserialize.

use std::collections::HashSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ProductId;

/// One product in a cart and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub quantity: NonZeroU32,
}

impl CartLine {
    /// A fresh line holding a single unit.
    #[must_use]
    pub const fn single(id: ProductId) -> Self {
        Self {
            id,
            quantity: NonZeroU32::MIN,
        }
    }

    /// Quantity as a plain integer.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity.get()
    }
}

/// Structural problems in a collection of cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartLinesError {
    #[error("duplicate cart line for product {0}")]
    DuplicateProduct(ProductId),
}

/// Check the one-line-per-product rule.
///
/// # Errors
///
/// Returns `CartLinesError::DuplicateProduct` naming the first repeated id.
pub fn validate_lines(lines: &[CartLine]) -> Result<(), CartLinesError> {
    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        if !seen.insert(line.id) {
            return Err(CartLinesError::DuplicateProduct(line.id));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_wire_format() {
        let line = CartLine::single(ProductId::new(7));
        assert_eq!(
            serde_json::to_string(&line).unwrap(),
            r#"{"id":7,"quantity":1}"#
        );
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let result = serde_json::from_str::<CartLine>(r#"{"id":7,"quantity":0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_quantity_is_rejected() {
        let result = serde_json::from_str::<CartLine>(r#"{"id":7,"quantity":-2}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_lines_detects_duplicates() {
        let lines = vec![
            CartLine::single(ProductId::new(1)),
            CartLine::single(ProductId::new(2)),
            CartLine::single(ProductId::new(1)),
        ];
        assert_eq!(
            validate_lines(&lines),
            Err(CartLinesError::DuplicateProduct(ProductId::new(1)))
        );
        assert!(validate_lines(&lines[..2]).is_ok());
        assert!(validate_lines(&[]).is_ok());
    }
}
