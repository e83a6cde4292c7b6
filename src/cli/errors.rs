//! CLI errors

use std::io;

use storefront::{
    context::StorefrontError,
    domain::{catalog::CatalogError, checkout::CheckoutError},
    gateway::fixtures::FixtureError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("could not load catalog fixture")]
    Fixture(#[from] FixtureError),

    #[error("could not load catalog")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error("product {0} not found")]
    ProductNotFound(String),

    #[error("category {0} not found")]
    CategoryNotFound(String),

    #[error("failed to serialize output")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output")]
    Io(#[from] io::Error),
}

/// Render an error with its chain of causes.
pub(crate) fn report(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
