//! Cart state - pure line-item bookkeeping.
//!
//! The cart is a local representation of the shopping cart, independent of
//! server persistence until checkout. All operations here are infallible;
//! the authentication gate lives in the store, not in the cart itself.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use electrostore_core::{CartLine, ProductId, ProductRef};

/// Ordered collection of cart lines, at most one per product ID.
///
/// Line order is insertion order: repeated adds for a product accumulate
/// into its existing line without moving it; new products append at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Rebuild a cart from persisted lines.
    pub(crate) fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add `quantity` units of a product.
    ///
    /// If a line for the product already exists its quantity is incremented
    /// in place; otherwise a new line is appended. Adding zero units is a
    /// no-op so the quantity >= 1 invariant holds for every stored line.
    pub fn add(&mut self, product: ProductRef, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine::new(product, quantity));
        }
    }

    /// Remove the line for a product. No-op if absent.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|l| l.product.id != product_id);
    }

    /// Set a line's quantity exactly (not incrementally).
    ///
    /// A quantity of zero or less removes the line, which is why the
    /// parameter is signed. No-op if no line exists for the product.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product_id) {
            line.quantity = quantity;
        }
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of snapshot price times quantity over all lines.
    ///
    /// Computed fresh on every call; no cached aggregate that could drift
    /// from the lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities, for badge display.
    #[must_use]
    pub fn items_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64, price: &str) -> ProductRef {
        ProductRef::new(
            ProductId::new(id),
            format!("Product {id}"),
            price.parse().unwrap(),
            String::new(),
        )
    }

    #[test]
    fn test_add_accumulates_by_product_id() {
        let mut cart = Cart::default();
        cart.add(product(1, "10.00"), 2);
        cart.add(product(1, "10.00"), 3);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
        assert_eq!(cart.items_count(), 5);
    }

    #[test]
    fn test_add_preserves_line_order() {
        let mut cart = Cart::default();
        cart.add(product(1, "1.00"), 1);
        cart.add(product(2, "2.00"), 1);
        cart.add(product(1, "1.00"), 1);
        cart.add(product(3, "3.00"), 1);

        let ids: Vec<i64> = cart
            .lines()
            .iter()
            .map(|l| l.product.id.as_i64())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_add_zero_units_is_noop() {
        let mut cart = Cart::default();
        cart.add(product(1, "10.00"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_line_is_noop() {
        let mut cart = Cart::default();
        cart.add(product(1, "10.00"), 1);
        cart.remove(ProductId::new(99));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_set_quantity_is_exact_not_incremental() {
        let mut cart = Cart::default();
        cart.add(product(1, "10.00"), 5);
        cart.set_quantity(ProductId::new(1), 2);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::default();
        cart.add(product(1, "10.00"), 5);
        cart.set_quantity(ProductId::new(1), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_negative_removes_line() {
        let mut cart = Cart::default();
        cart.add(product(1, "10.00"), 5);
        cart.set_quantity(ProductId::new(1), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let mut cart = Cart::default();
        cart.add(product(1, "19.99"), 2);
        cart.add(product(2, "5.50"), 3);

        assert_eq!(cart.total(), "56.48".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_total_invariant_under_add_order() {
        let mut forward = Cart::default();
        forward.add(product(1, "19.99"), 2);
        forward.add(product(2, "5.50"), 3);
        forward.add(product(1, "19.99"), 1);

        let mut reordered = Cart::default();
        reordered.add(product(2, "5.50"), 3);
        reordered.add(product(1, "19.99"), 1);
        reordered.add(product(1, "19.99"), 2);

        assert_eq!(forward.total(), reordered.total());
        assert_eq!(forward.items_count(), reordered.items_count());
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::default();
        cart.add(product(1, "10.00"), 2);
        cart.add(product(2, "20.00"), 1);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
