//! Post-processing that attaches product names to persisted line items:
//! distinct ids -> one lookup -> id map -> merge.

use std::collections::{HashMap, HashSet};

use models::{order, order_item};

use super::domain::{OrderItemView, OrderView};
use crate::products::{Product, ProductsError};

pub type ProductCatalog = HashMap<String, Product>;

/// Distinct ids in first-seen order.
pub fn distinct_product_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

pub fn index_products(products: Vec<Product>) -> ProductCatalog {
    products.into_iter().map(|p| (p.id.clone(), p)).collect()
}

pub fn missing_ids(ids: &[String], catalog: &ProductCatalog) -> Vec<String> {
    ids.iter().filter(|id| !catalog.contains_key(*id)).cloned().collect()
}

pub fn attach_product_names(
    order: order::Model,
    items: Vec<order_item::Model>,
    catalog: &ProductCatalog,
) -> Result<OrderView, ProductsError> {
    let mut missing = Vec::new();
    let order_items = items
        .into_iter()
        .map(|item| {
            let name = match catalog.get(&item.product_id) {
                Some(p) => p.name.clone(),
                None => {
                    missing.push(item.product_id.clone());
                    String::new()
                }
            };
            OrderItemView { product_id: item.product_id, quantity: item.quantity, price: item.price, name }
        })
        .collect();
    if !missing.is_empty() {
        return Err(ProductsError::Missing(missing));
    }
    Ok(OrderView { order, order_items })
}
