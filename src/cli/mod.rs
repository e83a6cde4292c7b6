//! Storefront CLI

use std::{io, sync::Arc};

use clap::{Parser, Subcommand};
use storefront::{
    context::StorefrontContext,
    domain::checkout::payment::SimulatedPayments,
    gateway::{InMemoryGateway, fixtures::currency_from_code},
};

use crate::cli::{
    catalog::{DealsArgs, FeaturedArgs, ProductArgs, ProductsArgs, SearchArgs},
    checkout::CheckoutArgs,
    config::{CheckoutConfig, LoggingConfig, StoreConfig},
    errors::CliError,
};

mod catalog;
mod checkout;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod logging;
mod render;

/// Browse the catalog and place orders against a fixture-backed store
#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Catalog source settings.
    #[command(flatten)]
    store: StoreConfig,

    /// Cart and checkout settings.
    #[command(flatten)]
    checkout: CheckoutConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List categories in display order
    Categories,

    /// List products, optionally for one category
    Products(ProductsArgs),

    /// Search names, descriptions and categories
    Search(SearchArgs),

    /// List discounted products, largest discount first
    Deals(DealsArgs),

    /// List featured products
    Featured(FeaturedArgs),

    /// Show one product
    Product(ProductArgs),

    /// Fill a cart and place an order
    Checkout(CheckoutArgs),
}

impl Cli {
    /// Load configuration from `.env`, the environment and arguments.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self) -> Result<(), CliError> {
        let currency = currency_from_code(&self.store.currency)?;
        let gateway = InMemoryGateway::from_fixture(&self.store.fixture, currency)?;

        let mut context = StorefrontContext::new(
            Arc::new(gateway),
            Arc::new(SimulatedPayments),
            self.checkout.settings(),
        );

        context.load_catalog().await?;

        let mut out = io::stdout().lock();

        match self.command {
            Commands::Categories => catalog::categories(&context.catalog, &mut out),
            Commands::Products(args) => catalog::products(&context.catalog, args, currency, &mut out),
            Commands::Search(args) => catalog::search(&context.catalog, &args, currency, &mut out),
            Commands::Deals(args) => catalog::deals(&context.catalog, &args, currency, &mut out),
            Commands::Featured(args) => {
                catalog::featured(&context.catalog, &args, currency, &mut out)
            }
            Commands::Product(args) => {
                catalog::product(&context.catalog, args, currency, &mut out).await
            }
            Commands::Checkout(args) => checkout::run(&mut context, args, currency, &mut out).await,
        }
    }
}
