//! Category listing filters and sort orders.

use std::cmp::Reverse;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::models::Product;

/// Sort order for a category listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ListingSort {
    /// Most reviewed first.
    #[default]
    Popular,

    /// Cheapest first.
    PriceAsc,

    /// Most expensive first.
    PriceDesc,

    /// Best rated first.
    Rating,

    /// Largest discount first.
    Discount,
}

/// Inclusive price bounds in minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub min: u64,
    pub max: Option<u64>,
}

impl PriceRange {
    pub fn contains(&self, price: u64) -> bool {
        price >= self.min && self.max.is_none_or(|max| price <= max)
    }
}

/// Filters applied on top of a category's products.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Matched against name and description, ignoring case.
    pub text: Option<String>,
    pub price: PriceRange,
    pub sort: ListingSort,
}

impl ListingQuery {
    /// Narrow and order `products`, keeping load order among equal keys.
    pub fn apply<'a>(&self, products: impl IntoIterator<Item = &'a Product>) -> Vec<&'a Product> {
        let needle = self
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);

        let mut listed: Vec<&Product> = products
            .into_iter()
            .filter(|product| self.price.contains(product.price))
            .filter(|product| {
                needle
                    .as_deref()
                    .is_none_or(|needle| matches_text(product, needle, false))
            })
            .collect();

        sort_products(&mut listed, self.sort);

        listed
    }
}

/// Stable sort of `products` by `sort`.
pub fn sort_products(products: &mut [&Product], sort: ListingSort) {
    match sort {
        ListingSort::Popular => products.sort_by_key(|product| Reverse(product.reviews)),
        ListingSort::PriceAsc => products.sort_by_key(|product| product.price),
        ListingSort::PriceDesc => products.sort_by_key(|product| Reverse(product.price)),
        ListingSort::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        ListingSort::Discount => {
            products.sort_by_key(|product| Reverse(product.discount_percent().unwrap_or(0)));
        }
    }
}

/// Case-insensitive substring match; `needle` must already be lowercase.
pub(crate) fn matches_text(product: &Product, needle: &str, include_category: bool) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
        || (include_category && product.category.as_str().to_lowercase().contains(needle))
}
