//! Storefront context
//!
//! Explicit state for one shopper: the loaded catalog, their cart and
//! wishlist, and the collaborators a checkout needs.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use thiserror::Error;
use tracing::debug;

use crate::{
    domain::{
        carts::{Cart, CartError, models::StockPolicy},
        catalog::{CatalogError, CatalogIndex, models::ProductId},
        checkout::{
            CheckoutSession, models::Identity, payment::PaymentAuthorizer, retry::RetryPolicy,
        },
        wishlist::Wishlist,
    },
    gateway::StoreGateway,
};

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("product {0} not found")]
    UnknownProduct(ProductId),
}

/// Tunables shared by every cart and checkout of a storefront.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorefrontSettings {
    pub stock_policy: StockPolicy,
    pub retry: RetryPolicy,
}

pub struct StorefrontContext {
    pub catalog: CatalogIndex,
    pub cart: Cart,
    pub wishlist: Wishlist,
    gateway: Arc<dyn StoreGateway>,
    payments: Arc<dyn PaymentAuthorizer>,
    settings: StorefrontSettings,
}

impl StorefrontContext {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn StoreGateway>,
        payments: Arc<dyn PaymentAuthorizer>,
        settings: StorefrontSettings,
    ) -> Self {
        Self {
            catalog: CatalogIndex::new(Arc::clone(&gateway)),
            cart: Cart::with_stock_policy(settings.stock_policy),
            wishlist: Wishlist::new(),
            gateway,
            payments,
            settings,
        }
    }

    pub fn settings(&self) -> StorefrontSettings {
        self.settings
    }

    /// Load (or reload) the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Load`] if the store cannot be read.
    pub async fn load_catalog(&mut self) -> Result<(), CatalogError> {
        self.catalog.load_all().await
    }

    /// Look up a product and add it to the cart.
    ///
    /// Returns the quantity now in the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] when the product does not exist, cannot
    /// be fetched, or the stock policy refuses the quantity.
    pub async fn add_product(
        &mut self,
        id: &ProductId,
        quantity: u32,
    ) -> Result<u32, StorefrontError> {
        let product = self
            .catalog
            .by_id(id)
            .await?
            .ok_or_else(|| StorefrontError::UnknownProduct(id.clone()))?;

        let held = self.cart.add_to_cart(&product, quantity)?;

        debug!(product = %id, quantity = held, "added to cart");

        Ok(held)
    }

    /// Start a checkout for the current cart.
    #[must_use]
    pub fn begin_checkout(&self, identity: Option<&Identity>) -> CheckoutSession {
        CheckoutSession::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.payments),
            self.settings.retry,
            identity,
        )
    }
}

impl Debug for StorefrontContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StorefrontContext")
            .field("catalog", &self.catalog)
            .field("cart", &self.cart)
            .field("wishlist", &self.wishlist)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
