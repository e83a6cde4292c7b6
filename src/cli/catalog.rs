//! Catalog commands

use std::io;

use clap::Args;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::Currency;
use storefront::domain::catalog::{
    CatalogIndex, DEFAULT_MIN_DISCOUNT,
    listing::{ListingQuery, ListingSort, PriceRange},
    models::{CategoryId, ProductId},
};

use crate::cli::{errors::CliError, render};

#[derive(Debug, Args)]
pub(crate) struct ProductsArgs {
    /// Only list products in this category
    #[arg(long)]
    category: Option<String>,

    /// Match against product names and descriptions
    #[arg(long)]
    query: Option<String>,

    /// Sort order
    #[arg(long, value_enum, default_value_t = ListingSort::Popular)]
    sort: ListingSort,

    /// Lowest price to include, in major units (e.g. 49.90)
    #[arg(long, value_parser = parse_amount)]
    min_price: Option<u64>,

    /// Highest price to include, in major units
    #[arg(long, value_parser = parse_amount)]
    max_price: Option<u64>,
}

#[derive(Debug, Args)]
pub(crate) struct SearchArgs {
    /// Text to look for in names, descriptions and categories
    query: String,
}

#[derive(Debug, Args)]
pub(crate) struct DealsArgs {
    /// Smallest discount percentage to include
    #[arg(long, default_value_t = DEFAULT_MIN_DISCOUNT)]
    min_discount: u8,
}

#[derive(Debug, Args)]
pub(crate) struct FeaturedArgs {
    /// Homepage section to list instead of the featured products
    #[arg(long)]
    section: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// Product id
    id: String,

    /// Print the product as JSON
    #[arg(long)]
    json: bool,
}

pub(crate) fn categories(catalog: &CatalogIndex, out: &mut impl io::Write) -> Result<(), CliError> {
    let counts: Vec<usize> = catalog
        .categories()
        .iter()
        .map(|category| catalog.by_category(&category.category_id).len())
        .collect();

    render::write_categories(out, catalog.categories(), &counts)?;

    Ok(())
}

pub(crate) fn products(
    catalog: &CatalogIndex,
    args: ProductsArgs,
    currency: &'static Currency,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let query = ListingQuery {
        text: args.query,
        price: PriceRange {
            min: args.min_price.unwrap_or(0),
            max: args.max_price,
        },
        sort: args.sort,
    };

    let listed = match args.category {
        Some(slug) => {
            let category = CategoryId::new(slug);

            if catalog.category_by_id(&category).is_none() {
                return Err(CliError::CategoryNotFound(category.into_string()));
            }

            catalog.listing(&category, &query)
        }
        None => query.apply(catalog.products()),
    };

    render::write_products(out, &listed, currency)?;

    Ok(())
}

pub(crate) fn search(
    catalog: &CatalogIndex,
    args: &SearchArgs,
    currency: &'static Currency,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    render::write_products(out, &catalog.search(&args.query), currency)?;

    Ok(())
}

pub(crate) fn deals(
    catalog: &CatalogIndex,
    args: &DealsArgs,
    currency: &'static Currency,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    render::write_products(out, &catalog.discounted(args.min_discount), currency)?;

    Ok(())
}

pub(crate) fn featured(
    catalog: &CatalogIndex,
    args: &FeaturedArgs,
    currency: &'static Currency,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let products = match args.section.as_deref() {
        Some(section) => catalog.by_section(section),
        None => catalog.featured(),
    };

    render::write_products(out, &products, currency)?;

    Ok(())
}

pub(crate) async fn product(
    catalog: &CatalogIndex,
    args: ProductArgs,
    currency: &'static Currency,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let id = ProductId::new(args.id);

    let product = catalog
        .by_id(&id)
        .await?
        .ok_or_else(|| CliError::ProductNotFound(id.into_string()))?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &*product)?;
        writeln!(out)?;
    } else {
        render::write_product_detail(out, &product, currency)?;
    }

    Ok(())
}

/// Parse a major-unit amount such as `49.90` into minor units.
pub(crate) fn parse_amount(s: &str) -> Result<u64, String> {
    s.trim()
        .parse::<Decimal>()
        .ok()
        .and_then(|amount| amount.checked_mul(Decimal::new(100, 0)))
        .and_then(|minor| minor.round_dp(0).to_u64())
        .ok_or_else(|| format!("expected a non-negative amount, got {s:?}"))
}
