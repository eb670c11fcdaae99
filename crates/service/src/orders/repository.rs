use async_trait::async_trait;
use models::{order, order_item, order_item::NewOrderItem, OrderStatus};
use uuid::Uuid;

use crate::errors::ServiceError;

pub type OrderWithItems = (order::Model, Vec<order_item::Model>);

/// Repository abstraction for order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist the order and its items atomically.
    async fn create(&self, total_amount: f64, total_items: i32, items: Vec<NewOrderItem>) -> Result<OrderWithItems, ServiceError>;
    async fn count(&self, status: Option<OrderStatus>) -> Result<u64, ServiceError>;
    async fn page(&self, status: Option<OrderStatus>, offset: u64, limit: u64) -> Result<Vec<order::Model>, ServiceError>;
    async fn find(&self, id: Uuid) -> Result<Option<order::Model>, ServiceError>;
    async fn find_with_items(&self, id: Uuid) -> Result<Option<OrderWithItems>, ServiceError>;
    async fn update_status(&self, current: order::Model, status: OrderStatus) -> Result<order::Model, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct MockOrderRepository {
        rows: Mutex<Vec<OrderWithItems>>, // insertion order
        update_calls: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl MockOrderRepository {
        /// Number of `update_status` calls that reached the store.
        pub fn update_calls(&self) -> usize { self.update_calls.load(Ordering::SeqCst) }

        /// Make every subsequent `create`/`update_status` fail like a lost connection.
        pub fn fail_writes(&self, fail: bool) { self.fail_writes.store(fail, Ordering::SeqCst) }

        pub async fn len(&self) -> usize { self.rows.lock().await.len() }

        pub async fn is_empty(&self) -> bool { self.rows.lock().await.is_empty() }

        fn check_writable(&self) -> Result<(), ServiceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("connection closed".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl OrderRepository for MockOrderRepository {
        async fn create(&self, total_amount: f64, total_items: i32, items: Vec<NewOrderItem>) -> Result<OrderWithItems, ServiceError> {
            self.check_writable()?;
            order::validate_totals(total_amount, total_items)?;
            for item in &items {
                item.validate()?;
            }
            let now = Utc::now().into();
            let o = order::Model {
                id: Uuid::new_v4(),
                total_amount,
                total_items,
                status: OrderStatus::Pending,
                paid: false,
                created_at: now,
                updated_at: now,
            };
            let rows: Vec<order_item::Model> = items
                .into_iter()
                .map(|i| order_item::Model { id: Uuid::new_v4(), order_id: o.id, product_id: i.product_id, quantity: i.quantity, price: i.price })
                .collect();
            self.rows.lock().await.push((o.clone(), rows.clone()));
            Ok((o, rows))
        }

        async fn count(&self, status: Option<OrderStatus>) -> Result<u64, ServiceError> {
            let rows = self.rows.lock().await;
            Ok(rows.iter().filter(|(o, _)| status.map_or(true, |s| o.status == s)).count() as u64)
        }

        async fn page(&self, status: Option<OrderStatus>, offset: u64, limit: u64) -> Result<Vec<order::Model>, ServiceError> {
            let rows = self.rows.lock().await;
            Ok(rows
                .iter()
                .filter(|(o, _)| status.map_or(true, |s| o.status == s))
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .map(|(o, _)| o.clone())
                .collect())
        }

        async fn find(&self, id: Uuid) -> Result<Option<order::Model>, ServiceError> {
            let rows = self.rows.lock().await;
            Ok(rows.iter().find(|(o, _)| o.id == id).map(|(o, _)| o.clone()))
        }

        async fn find_with_items(&self, id: Uuid) -> Result<Option<OrderWithItems>, ServiceError> {
            let rows = self.rows.lock().await;
            Ok(rows.iter().find(|(o, _)| o.id == id).cloned())
        }

        async fn update_status(&self, current: order::Model, status: OrderStatus) -> Result<order::Model, ServiceError> {
            self.check_writable()?;
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.lock().await;
            let (o, _) = rows
                .iter_mut()
                .find(|(o, _)| o.id == current.id)
                .ok_or_else(|| ServiceError::order_not_found(current.id))?;
            o.status = status;
            o.updated_at = Utc::now().into();
            Ok(o.clone())
        }
    }
}
