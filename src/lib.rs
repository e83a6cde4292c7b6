//! Storefront
//!
//! Storefront is the core of a direct-to-consumer shop: an in-memory catalog
//! index, a cart, a wishlist and a three-step checkout that writes orders
//! through a pluggable persistence gateway.

pub mod context;
pub mod domain;
pub mod gateway;
pub mod ids;
pub mod money;

#[cfg(test)]
mod test;
