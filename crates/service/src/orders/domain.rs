use models::{order, order_item, OrderStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// One requested line of `POST /orders`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: String,
    pub quantity: i64,
}

/// Items-driven create request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateOrderInput {
    pub items: Vec<OrderItemInput>,
}

/// A validated create request.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub items: Vec<DraftItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftItem {
    pub product_id: String,
    pub quantity: i32,
}

impl CreateOrderInput {
    pub fn validate(self) -> Result<OrderDraft, ServiceError> {
        if self.items.is_empty() {
            return Err(ServiceError::Validation("items must contain at least 1 element".into()));
        }
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| -> Result<DraftItem, ServiceError> {
                let at = |e: models::errors::ModelError| match e {
                    models::errors::ModelError::Validation(msg) => ServiceError::Validation(format!("items[{idx}]: {msg}")),
                    other => other.into(),
                };
                order_item::validate_product_id(&item.product_id).map_err(at)?;
                let quantity = order_item::validate_quantity(item.quantity).map_err(at)?;
                Ok(DraftItem { product_id: item.product_id, quantity })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OrderDraft { items })
    }
}

/// Query of `GET /orders`, as received.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderPaginationInput {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// A validated listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub pagination: Pagination,
}

impl OrderPaginationInput {
    pub fn validate(self) -> Result<OrderFilter, ServiceError> {
        let status = self.status.as_deref().map(parse_status).transpose()?;
        let pagination = Pagination::new(self.page, self.limit)?;
        Ok(OrderFilter { status, pagination })
    }
}

/// Body of `PATCH /orders/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChangeOrderStatusInput {
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub id: Uuid,
    pub status: OrderStatus,
}

impl ChangeOrderStatusInput {
    pub fn validate(self, raw_id: &str) -> Result<StatusChange, ServiceError> {
        Ok(StatusChange { id: parse_order_id(raw_id)?, status: parse_status(&self.status)? })
    }
}

pub fn parse_order_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::Validation(format!("id must be a UUID, got {raw:?}")))
}

pub fn parse_status(raw: &str) -> Result<OrderStatus, ServiceError> {
    raw.parse::<OrderStatus>().map_err(ServiceError::from)
}

/// Line item as returned to callers, with the product name attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub product_id: String,
    pub quantity: i32,
    pub price: f64,
    pub name: String,
}

/// An order with its enriched items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: order::Model,
    pub order_items: Vec<OrderItemView>,
}
