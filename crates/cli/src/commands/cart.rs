//! Cart commands.

use click_me_core::ProductId;
use click_me_storefront::{AppError, AppState};
use tracing::{info, warn};

/// Log the cart lines, item count and total.
pub async fn show(state: &AppState) {
    let cart = state.cart().await;

    if cart.is_empty() {
        info!("Your cart is empty");
        return;
    }

    for line in cart.lines() {
        info!(
            id = %line.id,
            quantity = line.quantity,
            "{} - {} each, {} total",
            line.name,
            click_me_core::Price::usd(line.price),
            click_me_core::Price::usd(line.line_total())
        );
    }
    info!(items = cart.count(), "Total: {}", cart.total_price());
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns `AppError::ProductNotFound` for an unknown id, or a storage error.
pub async fn add(state: &AppState, id: ProductId, quantity: u32) -> Result<(), AppError> {
    let mut cart = state.cart().await;
    let line = cart
        .add(id, quantity)?
        .ok_or(AppError::ProductNotFound(id))?;

    info!(
        quantity = line.quantity,
        items = cart.count(),
        "{} added to cart!",
        line.name
    );
    Ok(())
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns a storage error if the cart cannot be saved.
pub async fn remove(state: &AppState, id: ProductId) -> Result<(), AppError> {
    let mut cart = state.cart().await;
    if cart.remove(id)? {
        info!(id = %id, items = cart.count(), "Removed from cart");
    } else {
        warn!(id = %id, "Product was not in the cart");
    }
    Ok(())
}

/// Set the quantity of a cart line.
///
/// # Errors
///
/// Returns a storage error if the cart cannot be saved.
pub async fn set(state: &AppState, id: ProductId, quantity: i64) -> Result<(), AppError> {
    let mut cart = state.cart().await;

    match cart.set_quantity(id, quantity)? {
        Some(line) => info!(id = %id, quantity = line.quantity, "Quantity updated"),
        None => warn!(id = %id, "Product was not in the cart"),
    }
    info!(items = cart.count(), "Total: {}", cart.total_price());
    Ok(())
}
