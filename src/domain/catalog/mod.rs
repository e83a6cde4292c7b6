//! Catalog

pub mod errors;
pub mod index;
pub mod listing;
pub mod models;

pub use errors::CatalogError;
pub use index::*;
