use std::{fmt, str::FromStr};

use chrono::Utc;
use sea_orm::{
    entity::prelude::*, ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ModelError, order_item};

/// Lifecycle status of an order. Stored as its upper-case name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for OrderStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let up = s.trim().to_ascii_uppercase();
        OrderStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == up)
            .ok_or_else(|| {
                let valid: Vec<&str> = OrderStatus::ALL.iter().map(|st| st.as_str()).collect();
                ModelError::Validation(format!("status must be one of {}", valid.join(", ")))
            })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub total_amount: f64,
    pub total_items: i32,
    pub status: OrderStatus,
    pub paid: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { OrderItems }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::OrderItems => Entity::has_many(order_item::Entity).into(),
        }
    }
}

impl Related<order_item::Entity> for Entity {
    fn to() -> RelationDef { Relation::OrderItems.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_totals(total_amount: f64, total_items: i32) -> Result<(), ModelError> {
    if !(total_amount.is_finite() && total_amount > 0.0) {
        return Err(ModelError::Validation("totalAmount must be a positive number".into()));
    }
    if total_items <= 0 {
        return Err(ModelError::Validation("totalItems must be a positive integer".into()));
    }
    Ok(())
}

/// Insert the order and all of its items in one transaction. Nothing is written if any insert fails.
pub async fn create_with_items(
    db: &DatabaseConnection,
    total_amount: f64,
    total_items: i32,
    items: &[order_item::NewOrderItem],
) -> Result<(Model, Vec<order_item::Model>), ModelError> {
    validate_totals(total_amount, total_items)?;
    if items.is_empty() {
        return Err(ModelError::Validation("an order needs at least one item".into()));
    }
    for item in items {
        item.validate()?;
    }

    let txn = db.begin().await?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let order = ActiveModel {
        id: Set(Uuid::new_v4()),
        total_amount: Set(total_amount),
        total_items: Set(total_items),
        status: Set(OrderStatus::Pending),
        paid: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let mut created = Vec::with_capacity(items.len());
    for item in items {
        let row = order_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(item.product_id.clone()),
            quantity: Set(item.quantity),
            price: Set(item.price),
        }
        .insert(&txn)
        .await?;
        created.push(row);
    }
    txn.commit().await?;
    Ok((order, created))
}

fn by_status(status: Option<OrderStatus>) -> Select<Entity> {
    let mut finder = Entity::find();
    if let Some(s) = status {
        finder = finder.filter(Column::Status.eq(s));
    }
    finder
}

pub async fn count_by_status(db: &DatabaseConnection, status: Option<OrderStatus>) -> Result<u64, ModelError> {
    Ok(by_status(status).count(db).await?)
}

/// Offset and limit are bound as signed 64-bit integers.
pub fn check_window(offset: u64, limit: u64) -> Result<(), ModelError> {
    if i64::try_from(offset).is_err() || i64::try_from(limit).is_err() {
        return Err(ModelError::Validation(format!("page window out of range (offset {offset}, limit {limit})")));
    }
    Ok(())
}

/// One page of orders in insertion order (`created_at`, then `id` to break ties).
pub async fn page_by_status(
    db: &DatabaseConnection,
    status: Option<OrderStatus>,
    offset: u64,
    limit: u64,
) -> Result<Vec<Model>, ModelError> {
    check_window(offset, limit)?;
    let rows = by_status(status)
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_with_items(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<(Model, Vec<order_item::Model>)>, ModelError> {
    let Some(order) = Entity::find_by_id(id).one(db).await? else { return Ok(None) };
    let items = order.find_related(order_item::Entity).all(db).await?;
    Ok(Some((order, items)))
}

pub async fn set_status(db: &DatabaseConnection, current: Model, status: OrderStatus) -> Result<Model, ModelError> {
    let mut am: ActiveModel = current.into();
    am.status = Set(status);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}
