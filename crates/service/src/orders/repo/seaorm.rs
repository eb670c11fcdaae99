use models::{order, order_item::NewOrderItem, OrderStatus};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::orders::repository::{OrderRepository, OrderWithItems};

/// SeaORM-backed repository implementation. Holds a clone of the shared pool.
pub struct SeaOrmOrderRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn create(&self, total_amount: f64, total_items: i32, items: Vec<NewOrderItem>) -> Result<OrderWithItems, ServiceError> {
        Ok(order::create_with_items(&self.db, total_amount, total_items, &items).await?)
    }

    async fn count(&self, status: Option<OrderStatus>) -> Result<u64, ServiceError> {
        Ok(order::count_by_status(&self.db, status).await?)
    }

    async fn page(&self, status: Option<OrderStatus>, offset: u64, limit: u64) -> Result<Vec<order::Model>, ServiceError> {
        Ok(order::page_by_status(&self.db, status, offset, limit).await?)
    }

    async fn find(&self, id: Uuid) -> Result<Option<order::Model>, ServiceError> {
        Ok(order::find(&self.db, id).await?)
    }

    async fn find_with_items(&self, id: Uuid) -> Result<Option<OrderWithItems>, ServiceError> {
        Ok(order::find_with_items(&self.db, id).await?)
    }

    async fn update_status(&self, current: order::Model, status: OrderStatus) -> Result<order::Model, ServiceError> {
        Ok(order::set_status(&self.db, current, status).await?)
    }
}
