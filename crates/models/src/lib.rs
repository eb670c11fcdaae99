pub mod errors;
pub mod db;
pub mod order;
pub mod order_item;

pub use order::OrderStatus;

#[cfg(test)]
mod tests;
