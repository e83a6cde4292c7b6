//! Checkout

pub mod errors;
pub mod models;
pub mod payment;
pub mod retry;
pub mod session;
pub mod validation;

pub use errors::CheckoutError;
pub use session::{CheckoutSession, OrderReceipt};
