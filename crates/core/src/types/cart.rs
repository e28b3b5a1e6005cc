//! Cart line item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductRef;

/// One product-and-quantity entry in the shopping cart.
///
/// Invariant: `quantity >= 1`. A line whose quantity would drop to zero is
/// removed from the cart instead; the cart enforces at most one line per
/// distinct product ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot taken at add-time.
    pub product: ProductRef,
    /// Units of this product in the cart.
    pub quantity: u32,
}

impl CartLine {
    /// Create a new cart line.
    #[must_use]
    pub const fn new(product: ProductRef, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Line subtotal: snapshot price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ProductId;

    #[test]
    fn test_subtotal() {
        let product = ProductRef::new(
            ProductId::new(1),
            "Power Bank".to_owned(),
            Decimal::new(2450, 2),
            String::new(),
        );
        let line = CartLine::new(product, 3);
        assert_eq!(line.subtotal(), Decimal::new(7350, 2));
    }
}
