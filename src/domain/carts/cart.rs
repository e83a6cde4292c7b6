//! Cart

use tracing::debug;

use crate::domain::{
    carts::{
        errors::CartError,
        models::{CartLineItem, StockPolicy},
    },
    catalog::models::{Product, ProductId},
};

/// Shopping cart holding at most one line per product, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartLineItem>,
    stock_policy: StockPolicy,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stock_policy(stock_policy: StockPolicy) -> Self {
        Self {
            items: Vec::new(),
            stock_policy,
        }
    }

    pub fn stock_policy(&self) -> StockPolicy {
        self.stock_policy
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// Returns the quantity now held for the product. Adding zero units
    /// changes nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] when the stock policy refuses the new quantity.
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Result<u32, CartError> {
        let current = self.quantity_of(&product.id);

        if quantity == 0 {
            return Ok(current);
        }

        let allowed = self
            .stock_policy
            .allowed_quantity(product, current.saturating_add(quantity))?;

        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = allowed;
        } else {
            self.items.push(CartLineItem {
                product: product.clone(),
                quantity: allowed,
            });
        }

        debug!(product = %product.id, quantity = allowed, "cart line updated");

        Ok(allowed)
    }

    /// Set a line's quantity; zero or less removes the line. Unknown products
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] when the stock policy refuses the new quantity.
    pub fn update_quantity(&mut self, product: &ProductId, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove_from_cart(product);

            return Ok(());
        }

        let requested = u32::try_from(quantity).unwrap_or(u32::MAX);
        let policy = self.stock_policy;

        let Some(line) = self.line_mut(product) else {
            return Ok(());
        };

        line.quantity = policy.allowed_quantity(&line.product, requested)?;

        debug!(product = %product, quantity = line.quantity, "cart quantity set");

        Ok(())
    }

    /// Remove a product's line, returning it if it was present.
    pub fn remove_from_cart(&mut self, product: &ProductId) -> Option<CartLineItem> {
        let position = self
            .items
            .iter()
            .position(|line| line.product_id() == product)?;

        debug!(product = %product, "cart line removed");

        Some(self.items.remove(position))
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
    }

    /// Sum of price times quantity over all lines, in minor units.
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .fold(0, u64::saturating_add)
    }

    /// Sum of quantities over all lines.
    pub fn count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn get(&self, product: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.product_id() == product)
    }

    pub fn quantity_of(&self, product: &ProductId) -> u32 {
        self.get(product).map_or(0, |line| line.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn line_mut(&mut self, product: &ProductId) -> Option<&mut CartLineItem> {
        self.items
            .iter_mut()
            .find(|line| line.product_id() == product)
    }
}
