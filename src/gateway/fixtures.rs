//! Catalog Fixtures

use std::{fs, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, TRY, USD};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::catalog::models::{Category, CategoryId, Product, ProductId};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Price in a currency other than the storefront's
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: String, found: String },

    /// Discount outside 0 to 100
    #[error("Invalid discount for {product}: {discount}")]
    InvalidDiscount { product: String, discount: u8 },
}

/// Catalog file: categories plus products.
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Selling price (e.g., "1299.90 TRY")
    pub price: String,

    /// Pre-discount price, same format as `price`
    #[serde(default)]
    pub original_price: Option<String>,

    #[serde(default)]
    pub discount: Option<u8>,

    pub category: String,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub stock: u32,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub sections: Vec<String>,

    #[serde(default)]
    pub rating: f32,

    #[serde(default)]
    pub reviews: u32,

    #[serde(default)]
    pub specs: FxHashMap<String, String>,
}

impl CatalogFixture {
    /// Read a catalog fixture from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a catalog fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid fixture.
    pub fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Convert to catalog records priced in minor units of `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if any price is malformed or in another currency.
    pub fn into_catalog(
        self,
        currency: &'static Currency,
    ) -> Result<(Vec<Category>, Vec<Product>), FixtureError> {
        let products = self
            .products
            .into_iter()
            .map(|fixture| fixture.into_product(currency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((self.categories, products))
    }
}

impl ProductFixture {
    fn into_product(self, currency: &'static Currency) -> Result<Product, FixtureError> {
        if let Some(discount) = self.discount.filter(|discount| *discount > 100) {
            return Err(FixtureError::InvalidDiscount {
                product: self.id,
                discount,
            });
        }

        let price = parse_price_in(&self.price, currency)?;
        let original_price = self
            .original_price
            .as_deref()
            .map(|original| parse_price_in(original, currency))
            .transpose()?;

        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            price,
            original_price,
            discount: self.discount,
            category: CategoryId::new(self.category),
            images: self.images,
            stock: self.stock,
            featured: self.featured,
            sections: self.sections,
            rating: self.rating,
            reviews: self.reviews,
            specs: self.specs,
        })
    }
}

/// Look up a supported currency by ISO code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for unsupported codes.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "TRY" => Ok(TRY),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a non-negative decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(u64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_u64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency_from_code(currency_code)?))
}

fn parse_price_in(s: &str, expected: &'static Currency) -> Result<u64, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    if currency != expected {
        return Err(FixtureError::CurrencyMismatch {
            expected: expected.iso_alpha_code.to_string(),
            found: currency.iso_alpha_code.to_string(),
        });
    }

    Ok(minor_units)
}
