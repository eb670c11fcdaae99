use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ModelError, order};

pub const PRODUCT_ID_MAX_LEN: usize = 64;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
    /// Unit price snapshotted from the Products service at creation time.
    pub price: f64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Order }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Order => Entity::belongs_to(order::Entity)
                .from(Column::OrderId)
                .to(order::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<order::Entity> for Entity {
    fn to() -> RelationDef { Relation::Order.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// A line item ready to be persisted with a resolved price.
#[derive(Clone, Debug, PartialEq)]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: i32,
    pub price: f64,
}

impl NewOrderItem {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_product_id(&self.product_id)?;
        if self.quantity <= 0 {
            return Err(ModelError::Validation("quantity must be a positive integer".into()));
        }
        validate_price(self.price)
    }
}

pub fn validate_product_id(id: &str) -> Result<(), ModelError> {
    if id.trim().is_empty() {
        return Err(ModelError::Validation("productId must not be empty".into()));
    }
    if id.len() > PRODUCT_ID_MAX_LEN {
        return Err(ModelError::Validation(format!("productId must be at most {PRODUCT_ID_MAX_LEN} characters")));
    }
    Ok(())
}

/// Accepts the raw request value and narrows it to the stored column type.
pub fn validate_quantity(q: i64) -> Result<i32, ModelError> {
    if q <= 0 {
        return Err(ModelError::Validation("quantity must be a positive integer".into()));
    }
    i32::try_from(q).map_err(|_| ModelError::Validation("quantity is too large".into()))
}

pub fn validate_price(price: f64) -> Result<(), ModelError> {
    if !(price.is_finite() && price > 0.0) {
        return Err(ModelError::Validation("price must be a positive number".into()));
    }
    Ok(())
}
