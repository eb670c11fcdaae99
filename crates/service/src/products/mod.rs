//! Client side of the external Products service.
//!
//! The only capability consumed is batch validation: a list of product ids in,
//! the matching `{ id, price, name }` records out.

pub mod client;
pub mod errors;

pub use client::{HttpProductsClient, Product, ProductsClient};
pub use errors::ProductsError;
