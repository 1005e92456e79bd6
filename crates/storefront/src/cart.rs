//! Shopping cart persisted to key-value storage.
//!
//! Lines carry a snapshot of the product taken when it was first added, so
//! later catalog price changes never reprice an existing cart.
//!
//! Every mutation is staged on a copy, written to storage, and only then
//! committed to memory. A failed write leaves the cart unchanged.

use std::sync::Arc;

use click_me_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::catalog::{Catalog, Product};
use crate::storage::{KeyValueStore, StorageError, keys, read_json, write_json};

/// Largest quantity the product page quantity picker allows.
pub const MAX_SELECTABLE_QUANTITY: u32 = 10;

/// One product's entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    /// Unit price captured when the product was added.
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// The shopping cart.
pub struct CartStore {
    lines: Vec<CartLine>,
    catalog: Arc<Catalog>,
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Rehydrate the cart from storage.
    ///
    /// A missing or malformed stored cart yields an empty cart. Stored lines
    /// for the same product are merged and quantities below 1 become 1.
    #[must_use]
    pub fn load(catalog: Arc<Catalog>, storage: Arc<dyn KeyValueStore>) -> Self {
        let stored: Vec<CartLine> = read_json(storage.as_ref(), keys::CART).unwrap_or_default();

        let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
        for mut line in stored {
            line.quantity = line.quantity.max(1);
            match lines.iter_mut().find(|existing| existing.id == line.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => lines.push(line),
            }
        }

        tracing::debug!(lines = lines.len(), "Cart rehydrated");
        Self {
            lines,
            catalog,
            storage,
        }
    }

    /// Add `quantity` of a product, merging with an existing line.
    ///
    /// Returns the updated line, or `None` without touching storage when the
    /// product id is not in the catalog. A quantity of 0 adds one item.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn add(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Option<CartLine>, StorageError> {
        let Some(product) = self.catalog.find_by_id(product_id) else {
            tracing::debug!("Ignoring add for unknown product");
            return Ok(None);
        };
        let quantity = quantity.max(1);

        let mut next = self.lines.clone();
        let index = if let Some(index) = next.iter().position(|line| line.id == product_id) {
            if let Some(line) = next.get_mut(index) {
                line.quantity = line.quantity.saturating_add(quantity);
            }
            index
        } else {
            next.push(CartLine::snapshot(product, quantity));
            next.len() - 1
        };

        self.commit(next)?;
        let line = self.lines.get(index).cloned();
        tracing::info!(quantity, "Added to cart");
        Ok(line)
    }

    /// Remove the line for `product_id`. Returns whether a line was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove(&mut self, product_id: ProductId) -> Result<bool, StorageError> {
        let mut next = self.lines.clone();
        next.retain(|line| line.id != product_id);
        let removed = next.len() != self.lines.len();

        self.commit(next)?;
        if removed {
            tracing::info!("Removed from cart");
        }
        Ok(removed)
    }

    /// Set a line's quantity, clamped to at least 1.
    ///
    /// Returns the updated line, or `None` if the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cart cannot be persisted.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Option<CartLine>, StorageError> {
        let Some(index) = self.lines.iter().position(|line| line.id == product_id) else {
            return Ok(None);
        };
        let clamped = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);

        let mut next = self.lines.clone();
        if let Some(line) = next.get_mut(index) {
            line.quantity = clamped;
        }

        self.commit(next)?;
        tracing::info!(quantity = clamped, "Updated cart quantity");
        Ok(self.lines.get(index).cloned())
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Cart total as a display price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::usd(self.total())
    }

    /// Total number of items, for the cart badge.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == product_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn commit(&mut self, next: Vec<CartLine>) -> Result<(), StorageError> {
        write_json(self.storage.as_ref(), keys::CART, &next)?;
        self.lines = next;
        Ok(())
    }
}

/// Step the product page quantity picker, staying within `[1, 10]`.
#[must_use]
pub fn adjust_selected_quantity(current: u32, delta: i32) -> u32 {
    let next = i64::from(current) + i64::from(delta);
    let clamped = next.clamp(1, i64::from(MAX_SELECTABLE_QUANTITY));
    u32::try_from(clamped).unwrap_or(1)
}
