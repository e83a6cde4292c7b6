//! Persistence gateway.
//!
//! The storefront reads its catalog from, and writes orders, leads and
//! customers to, a document store behind [`StoreGateway`].

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::domain::{
    catalog::models::{Category, NewProduct, Product, ProductId},
    customers::models::{NewCompletedCustomer, NewLead},
    orders::models::{FulfilmentStatus, NewOrder, OrderId},
};

pub mod fixtures;
pub mod memory;

pub use memory::InMemoryGateway;

/// Store Errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The store could not be reached; the call may succeed if repeated.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the write.
    #[error("store rejected the request: {0}")]
    Rejected(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl GatewayError {
    /// Whether repeating the call might succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

#[automock]
#[async_trait]
pub trait StoreGateway: Send + Sync {
    /// Every product in the store.
    async fn fetch_all_products(&self) -> Result<Vec<Product>, GatewayError>;

    /// Every category in the store, unordered.
    async fn fetch_all_categories(&self) -> Result<Vec<Category>, GatewayError>;

    /// A single product, `None` when the store has no such id.
    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, GatewayError>;

    /// Persist an order. Either the order exists afterwards or an error is
    /// returned.
    async fn create_order(&self, order: NewOrder) -> Result<OrderId, GatewayError>;

    /// Change the fulfilment status of a placed order.
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: FulfilmentStatus,
    ) -> Result<(), GatewayError>;

    /// Record contact details from an unfinished checkout.
    async fn create_lead(&self, lead: NewLead) -> Result<(), GatewayError>;

    /// Record a customer who placed an order.
    async fn create_completed_customer(
        &self,
        customer: NewCompletedCustomer,
    ) -> Result<(), GatewayError>;

    /// Add a product to the catalog.
    async fn create_product(&self, product: NewProduct) -> Result<Product, GatewayError>;

    /// Replace a product's fields.
    async fn update_product(
        &self,
        id: &ProductId,
        product: NewProduct,
    ) -> Result<Product, GatewayError>;

    /// Remove a product from the catalog.
    async fn delete_product(&self, id: &ProductId) -> Result<(), GatewayError>;
}
