//! Customers

pub mod models;
