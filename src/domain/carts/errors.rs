//! Cart errors.

use thiserror::Error;

use crate::domain::catalog::models::ProductId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("product {product} is out of stock")]
    OutOfStock { product: ProductId },

    #[error("only {available} of product {product} in stock, {requested} requested")]
    InsufficientStock {
        product: ProductId,
        requested: u32,
        available: u32,
    },
}
