//! Cart Models

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{
    carts::errors::CartError,
    catalog::models::{Product, ProductId},
};

/// CartLineItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    /// Product as it was when first added.
    pub product: Product,
    pub quantity: u32,
}

impl CartLineItem {
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price times quantity, in minor units.
    pub fn line_total(&self) -> u64 {
        self.product.price.saturating_mul(u64::from(self.quantity))
    }
}

/// How a cart treats quantities above a product's stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StockPolicy {
    /// Stock is informational; any quantity is accepted.
    #[default]
    Unbounded,

    /// Quantities are capped at the available stock.
    Clamp,

    /// Quantities above the available stock are refused.
    Reject,
}

impl StockPolicy {
    /// Quantity the cart may hold when `requested` units of `product` are wanted.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] when the policy refuses the quantity.
    pub fn allowed_quantity(self, product: &Product, requested: u32) -> Result<u32, CartError> {
        match self {
            Self::Unbounded => Ok(requested),
            Self::Clamp if product.stock == 0 => Err(CartError::OutOfStock {
                product: product.id.clone(),
            }),
            Self::Clamp => Ok(requested.min(product.stock)),
            Self::Reject if requested > product.stock => Err(CartError::InsufficientStock {
                product: product.id.clone(),
                requested,
                available: product.stock,
            }),
            Self::Reject => Ok(requested),
        }
    }
}
