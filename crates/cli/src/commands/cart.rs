//! Cart commands.

use std::str::FromStr;

use rust_decimal::Decimal;

use electrostore_client::Store;
use electrostore_core::{ProductId, ProductRef};

use super::CliError;

/// Add a product snapshot to the cart.
pub fn add(
    store: &Store,
    id: i64,
    name: &str,
    price: &str,
    image: String,
    quantity: u32,
) -> Result<(), CliError> {
    let price = Decimal::from_str(price)
        .map_err(|e| CliError::InvalidPrice(price.to_owned(), e))?;

    let product = ProductRef::new(ProductId::new(id), name.to_owned(), price, image);
    store.add_to_cart(product, quantity)?;

    tracing::info!("Added {quantity} x {name}");
    show(store);
    Ok(())
}

/// Remove a product's line.
pub fn remove(store: &Store, id: i64) -> Result<(), CliError> {
    store.remove_from_cart(ProductId::new(id))?;
    show(store);
    Ok(())
}

/// Set a line's quantity exactly; zero or negative removes the line.
pub fn set_quantity(store: &Store, id: i64, quantity: i64) -> Result<(), CliError> {
    store.update_cart_quantity(ProductId::new(id), quantity)?;
    show(store);
    Ok(())
}

/// Empty the cart.
pub fn clear(store: &Store) -> Result<(), CliError> {
    store.clear_cart()?;
    tracing::info!("Cart cleared");
    Ok(())
}

/// Print the cart lines, item count, and total.
pub fn show(store: &Store) {
    let lines = store.cart_lines();
    if lines.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for line in &lines {
        tracing::info!(
            "  {} x {} @ {} = {}",
            line.quantity,
            line.product.name,
            line.product.price,
            line.subtotal()
        );
    }
    tracing::info!(
        "{} item(s), total {}",
        store.cart_items_count(),
        store.cart_total()
    );
}
