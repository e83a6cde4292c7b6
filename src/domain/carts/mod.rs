//! Carts

pub mod cart;
pub mod errors;
pub mod models;

pub use cart::Cart;
pub use errors::CartError;
