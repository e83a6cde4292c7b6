//! Orders

pub mod models;

pub use models::{OrderId, order_number};
