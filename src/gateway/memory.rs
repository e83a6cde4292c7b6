//! In-memory store

use std::{
    path::Path,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use rusty_money::iso::Currency;
use rustc_hash::FxHashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    domain::{
        catalog::models::{Category, NewProduct, Product, ProductId},
        customers::models::{NewCompletedCustomer, NewLead},
        orders::models::{FulfilmentStatus, NewOrder, OrderId, OrderRecord},
    },
    gateway::{
        GatewayError, StoreGateway,
        fixtures::{CatalogFixture, FixtureError},
    },
};

#[derive(Debug, Default)]
struct Store {
    products: Vec<Product>,
    categories: Vec<Category>,
    orders: Vec<OrderRecord>,
    orders_by_key: FxHashMap<Uuid, OrderId>,
    leads: Vec<NewLead>,
    completed_customers: Vec<NewCompletedCustomer>,
}

/// Process-local store used by the CLI and tests.
///
/// Orders carrying an idempotency key that was already written return the
/// existing order id instead of creating a second order.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    store: Mutex<Store>,
}

impl InMemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_catalog(categories: Vec<Category>, products: Vec<Product>) -> Self {
        Self {
            store: Mutex::new(Store {
                products,
                categories,
                ..Store::default()
            }),
        }
    }

    /// Seed the store from a YAML catalog priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn from_fixture(path: &Path, currency: &'static Currency) -> Result<Self, FixtureError> {
        let (categories, products) = CatalogFixture::from_path(path)?.into_catalog(currency)?;

        info!(
            path = %path.display(),
            products = products.len(),
            categories = categories.len(),
            "loaded catalog fixture"
        );

        Ok(Self::with_catalog(categories, products))
    }

    /// Orders written so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unavailable`] if the store lock is poisoned.
    pub fn orders(&self) -> Result<Vec<OrderRecord>, GatewayError> {
        Ok(self.lock()?.orders.clone())
    }

    /// Leads written so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unavailable`] if the store lock is poisoned.
    pub fn leads(&self) -> Result<Vec<NewLead>, GatewayError> {
        Ok(self.lock()?.leads.clone())
    }

    /// Completed customers written so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Unavailable`] if the store lock is poisoned.
    pub fn completed_customers(&self) -> Result<Vec<NewCompletedCustomer>, GatewayError> {
        Ok(self.lock()?.completed_customers.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, GatewayError> {
        self.store
            .lock()
            .map_err(|_err| GatewayError::Unavailable("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl StoreGateway for InMemoryGateway {
    async fn fetch_all_products(&self) -> Result<Vec<Product>, GatewayError> {
        Ok(self.lock()?.products.clone())
    }

    async fn fetch_all_categories(&self) -> Result<Vec<Category>, GatewayError> {
        Ok(self.lock()?.categories.clone())
    }

    async fn fetch_product_by_id(&self, id: &ProductId) -> Result<Option<Product>, GatewayError> {
        Ok(self
            .lock()?
            .products
            .iter()
            .find(|product| &product.id == id)
            .cloned())
    }

    async fn create_order(&self, order: NewOrder) -> Result<OrderId, GatewayError> {
        let mut store = self.lock()?;

        if let Some(existing) = store.orders_by_key.get(&order.idempotency_key) {
            debug!(order = %existing, "duplicate order write ignored");

            return Ok(existing.clone());
        }

        let id = OrderId::generate();

        store.orders_by_key.insert(order.idempotency_key, id.clone());
        store.orders.push(OrderRecord {
            id: id.clone(),
            order,
        });

        Ok(id)
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: FulfilmentStatus,
    ) -> Result<(), GatewayError> {
        let mut store = self.lock()?;

        let record = store
            .orders
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| GatewayError::NotFound(format!("order {id}")))?;

        record.order.status = status;

        Ok(())
    }

    async fn create_lead(&self, lead: NewLead) -> Result<(), GatewayError> {
        self.lock()?.leads.push(lead);

        Ok(())
    }

    async fn create_completed_customer(
        &self,
        customer: NewCompletedCustomer,
    ) -> Result<(), GatewayError> {
        self.lock()?.completed_customers.push(customer);

        Ok(())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, GatewayError> {
        let product = product.into_product(ProductId::generate());

        self.lock()?.products.push(product.clone());

        Ok(product)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        product: NewProduct,
    ) -> Result<Product, GatewayError> {
        let mut store = self.lock()?;

        let existing = store
            .products
            .iter_mut()
            .find(|existing| &existing.id == id)
            .ok_or_else(|| GatewayError::NotFound(format!("product {id}")))?;

        *existing = product.into_product(id.clone());

        Ok(existing.clone())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), GatewayError> {
        let mut store = self.lock()?;
        let before = store.products.len();

        store.products.retain(|product| &product.id != id);

        if store.products.len() == before {
            return Err(GatewayError::NotFound(format!("product {id}")));
        }

        Ok(())
    }
}
