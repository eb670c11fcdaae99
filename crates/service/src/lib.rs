//! Service layer providing the order operations on top of models.
//! - Separates business logic from data access (`OrderRepository`).
//! - Talks to the external Products service through `ProductsClient`.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod products;
pub mod orders;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use orders::OrdersService;
