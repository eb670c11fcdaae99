//! Orders module: three-layer architecture (domain, repository, service).
//!
//! Request shapes are validated into domain values at the boundary; the
//! service resolves products, computes totals and delegates persistence to an
//! `OrderRepository`.

pub mod domain;
pub mod enrich;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::OrdersService;
