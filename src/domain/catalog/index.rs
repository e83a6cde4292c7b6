//! Catalog Index

use std::{
    borrow::Cow,
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use tracing::{debug, error, info, warn};

use crate::{
    domain::catalog::{
        errors::CatalogError,
        listing::{ListingQuery, matches_text},
        models::{Category, CategoryId, FEATURED_SECTION, Product, ProductId},
    },
    gateway::StoreGateway,
};

/// Smallest discount shown on the deals page.
pub const DEFAULT_MIN_DISCOUNT: u8 = 10;

/// Load state of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogStatus {
    Loading,
    Ready,
    Failed(String),
}

/// In-memory read layer over the products and categories fetched at startup.
///
/// Every query is a fresh linear scan over the loaded arrays.
#[derive(Clone)]
pub struct CatalogIndex {
    gateway: Arc<dyn StoreGateway>,
    products: Vec<Product>,
    categories: Vec<Category>,
    status: CatalogStatus,
}

impl CatalogIndex {
    #[must_use]
    pub fn new(gateway: Arc<dyn StoreGateway>) -> Self {
        Self {
            gateway,
            products: Vec::new(),
            categories: Vec::new(),
            status: CatalogStatus::Loading,
        }
    }

    /// Fetch every product and category, replacing both lists together.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Load`] when either fetch fails; the previously
    /// loaded lists are kept.
    pub async fn load_all(&mut self) -> Result<(), CatalogError> {
        self.status = CatalogStatus::Loading;

        let fetched = tokio::try_join!(
            self.gateway.fetch_all_products(),
            self.gateway.fetch_all_categories(),
        );

        let (products, mut categories) = match fetched {
            Ok(fetched) => fetched,
            Err(source) => {
                error!("failed to load catalog: {source}");

                self.status = CatalogStatus::Failed(source.to_string());

                return Err(CatalogError::Load(source));
            }
        };

        categories.sort_by_key(Category::display_rank);

        for product in products.iter().filter(|p| !p.discount_is_consistent()) {
            warn!(
                product = %product.id,
                discount = ?product.discount,
                implied = ?product.implied_discount(),
                "advertised discount does not match price history"
            );
        }

        info!(
            products = products.len(),
            categories = categories.len(),
            "catalog loaded"
        );

        (self.products, self.categories) = (products, categories);
        self.status = CatalogStatus::Ready;

        Ok(())
    }

    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    /// All loaded products in load order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All loaded categories in display order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn by_category(&self, category: &CategoryId) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| &product.category == category)
            .collect()
    }

    /// Products flagged as featured or pinned to the featured section.
    pub fn featured(&self) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.featured || product.in_section(FEATURED_SECTION))
            .collect()
    }

    pub fn by_section(&self, section: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.in_section(section))
            .collect()
    }

    /// Products discounted by at least `min_discount` percent, largest first.
    pub fn discounted(&self, min_discount: u8) -> Vec<&Product> {
        let mut discounted: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| {
                product
                    .discount_percent()
                    .is_some_and(|discount| discount >= min_discount)
            })
            .collect();

        discounted.sort_by(|a, b| b.discount_percent().cmp(&a.discount_percent()));

        discounted
    }

    /// Case-insensitive match against name, description and category.
    ///
    /// A blank query matches nothing. Other queries match as typed, surrounding
    /// whitespace included.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let needle = query.to_lowercase();

        self.products
            .iter()
            .filter(|product| matches_text(product, &needle, true))
            .collect()
    }

    /// A category page: its products narrowed and ordered by `query`.
    pub fn listing(&self, category: &CategoryId, query: &ListingQuery) -> Vec<&Product> {
        query.apply(self.by_category(category))
    }

    /// Look a product up in the loaded list, then in the store.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Fetch`] when the store lookup fails.
    pub async fn by_id(&self, id: &ProductId) -> Result<Option<Cow<'_, Product>>, CatalogError> {
        if let Some(product) = self.products.iter().find(|product| &product.id == id) {
            return Ok(Some(Cow::Borrowed(product)));
        }

        debug!(product = %id, "product not loaded, fetching from store");

        let fetched = self
            .gateway
            .fetch_product_by_id(id)
            .await
            .map_err(CatalogError::Fetch)?;

        Ok(fetched.map(Cow::Owned))
    }

    pub fn category_by_id(&self, category: &CategoryId) -> Option<&Category> {
        self.categories
            .iter()
            .find(|candidate| &candidate.category_id == category)
    }
}

impl Debug for CatalogIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CatalogIndex")
            .field("products", &self.products.len())
            .field("categories", &self.categories.len())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
