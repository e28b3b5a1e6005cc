//! Product snapshot carried by cart lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// Immutable snapshot of a product at the time it was added to the cart.
///
/// The snapshot is deliberately not re-validated against live stock or
/// pricing until checkout: the price at add-time is the binding contract.
/// The API serializes prices as decimal strings to avoid float rounding,
/// so `price` round-trips through string serde.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    /// Product ID on the remote API.
    pub id: ProductId,
    /// Display name at add-time.
    pub name: String,
    /// Unit price at add-time.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    /// Image URL at add-time.
    pub image: String,
}

impl ProductRef {
    /// Create a new product snapshot.
    #[must_use]
    pub const fn new(id: ProductId, name: String, price: Decimal, image: String) -> Self {
        Self {
            id,
            name,
            price,
            image,
        }
    }
}
