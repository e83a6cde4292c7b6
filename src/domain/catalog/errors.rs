//! Catalog errors.

use thiserror::Error;

use crate::gateway::GatewayError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to load catalog")]
    Load(#[source] GatewayError),

    #[error("failed to fetch product")]
    Fetch(#[source] GatewayError),
}
