//! Wishlist

use crate::domain::catalog::models::{Product, ProductId};

/// Saved products, most recently added last, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct Wishlist {
    items: Vec<Product>,
}

impl Wishlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Save the product, or remove it if already saved.
    ///
    /// Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.remove(&product.id).is_some() {
            return false;
        }

        self.items.push(product.clone());

        true
    }

    pub fn remove(&mut self, product: &ProductId) -> Option<Product> {
        let position = self.items.iter().position(|saved| &saved.id == product)?;

        Some(self.items.remove(position))
    }

    pub fn contains(&self, product: &ProductId) -> bool {
        self.items.iter().any(|saved| &saved.id == product)
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
