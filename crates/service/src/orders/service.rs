use std::sync::Arc;

use models::{order, order_item::NewOrderItem};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{OrderDraft, OrderFilter, OrderView, StatusChange};
use super::enrich::{attach_product_names, distinct_product_ids, index_products, missing_ids, ProductCatalog};
use super::repository::OrderRepository;
use crate::errors::ServiceError;
use crate::pagination::Paginated;
use crate::products::{ProductsClient, ProductsError};

/// Order business service independent of web framework.
///
/// Holds its collaborators as injected handles; connection lifecycle belongs to whoever built them.
pub struct OrdersService {
    repo: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductsClient>,
}

impl OrdersService {
    pub fn new(repo: Arc<dyn OrderRepository>, products: Arc<dyn ProductsClient>) -> Self {
        Self { repo, products }
    }

    /// Resolve prices, compute totals and persist the order with its items.
    ///
    /// Every failure is reported as a tagged 400 carrying the underlying message.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::orders::{OrdersService, domain::{DraftItem, OrderDraft}, repository::mock::MockOrderRepository};
    /// use service::products::client::mock::{product, StaticProductsClient};
    /// let products = StaticProductsClient::new([product("P1", 10.0, "Keyboard"), product("P2", 5.0, "Mouse")]);
    /// let svc = OrdersService::new(Arc::new(MockOrderRepository::default()), Arc::new(products));
    /// let draft = OrderDraft { items: vec![
    ///     DraftItem { product_id: "P1".into(), quantity: 2 },
    ///     DraftItem { product_id: "P2".into(), quantity: 1 },
    /// ] };
    /// let view = tokio_test::block_on(svc.create(draft)).unwrap();
    /// assert_eq!(view.order.total_amount, 25.0);
    /// assert_eq!(view.order.total_items, 3);
    /// ```
    #[instrument(skip(self, draft), fields(items = draft.items.len()))]
    pub async fn create(&self, draft: OrderDraft) -> Result<OrderView, ServiceError> {
        self.try_create(draft).await.map_err(|e| {
            warn!(error = %e, "order_create_failed");
            ServiceError::bad_request(e.to_string())
        })
    }

    async fn try_create(&self, draft: OrderDraft) -> Result<OrderView, ServiceError> {
        let ids = distinct_product_ids(draft.items.iter().map(|i| i.product_id.as_str()));
        let catalog = self.resolve(&ids).await?;

        let mut total_amount = 0.0;
        let mut total_items: i32 = 0;
        let mut rows = Vec::with_capacity(draft.items.len());
        for item in draft.items {
            let price = catalog
                .get(&item.product_id)
                .map(|p| p.price)
                .ok_or_else(|| ProductsError::Missing(vec![item.product_id.clone()]))?;
            total_amount += price * f64::from(item.quantity);
            total_items = total_items
                .checked_add(item.quantity)
                .ok_or_else(|| ServiceError::Validation("total quantity is too large".into()))?;
            rows.push(NewOrderItem { product_id: item.product_id, quantity: item.quantity, price });
        }

        let (created, items) = self.repo.create(total_amount, total_items, rows).await?;
        info!(order_id = %created.id, total_amount, total_items, "order_created");
        Ok(attach_product_names(created, items, &catalog)?)
    }

    /// One page of orders plus pagination metadata. Count and page use the same filter
    /// but are separate reads, so concurrent writes can make them disagree.
    #[instrument(skip(self), fields(status = ?filter.status, page = filter.pagination.page, limit = filter.pagination.limit))]
    pub async fn find_all(&self, filter: OrderFilter) -> Result<Paginated<order::Model>, ServiceError> {
        let total = self.repo.count(filter.status).await?;
        let data = self
            .repo
            .page(filter.status, filter.pagination.offset(), filter.pagination.limit)
            .await?;
        Ok(Paginated { data, meta: filter.pagination.meta(total) })
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> Result<OrderView, ServiceError> {
        let (found, items) = self
            .repo
            .find_with_items(id)
            .await?
            .ok_or_else(|| ServiceError::order_not_found(id))?;
        let ids = distinct_product_ids(items.iter().map(|i| i.product_id.as_str()));
        let catalog = self.resolve(&ids).await?;
        Ok(attach_product_names(found, items, &catalog)?)
    }

    /// Set the status unless it is already the requested one; in that case nothing is written.
    #[instrument(skip(self), fields(order_id = %change.id, status = %change.status))]
    pub async fn change_status(&self, change: StatusChange) -> Result<order::Model, ServiceError> {
        let current = self
            .repo
            .find(change.id)
            .await?
            .ok_or_else(|| ServiceError::order_not_found(change.id))?;
        if current.status == change.status {
            debug!("status unchanged; skipping update");
            return Ok(current);
        }
        let from = current.status;
        let updated = self.repo.update_status(current, change.status).await?;
        info!(order_id = %updated.id, %from, to = %updated.status, "order_status_changed");
        Ok(updated)
    }

    /// One batched lookup; fails unless every id comes back.
    async fn resolve(&self, ids: &[String]) -> Result<ProductCatalog, ServiceError> {
        if ids.is_empty() {
            return Ok(ProductCatalog::new());
        }
        let products = self.products.validate_products(ids).await.map_err(|e| {
            warn!(error = %e, "product_resolution_failed");
            e
        })?;
        let catalog = index_products(products);
        let missing = missing_ids(ids, &catalog);
        if !missing.is_empty() {
            return Err(ProductsError::Missing(missing).into());
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{BAD_REQUEST, NOT_FOUND};
    use crate::orders::domain::{DraftItem, OrderFilter};
    use crate::orders::repository::mock::MockOrderRepository;
    use crate::pagination::{PageMeta, Pagination};
    use crate::products::client::mock::{product, StaticProductsClient};
    use models::OrderStatus;

    struct Fixture {
        repo: Arc<MockOrderRepository>,
        products: Arc<StaticProductsClient>,
        svc: OrdersService,
    }

    fn fixture_with(products: StaticProductsClient) -> Fixture {
        let repo = Arc::new(MockOrderRepository::default());
        let products = Arc::new(products);
        let svc = OrdersService::new(repo.clone(), products.clone());
        Fixture { repo, products, svc }
    }

    fn fixture() -> Fixture {
        fixture_with(StaticProductsClient::new([
            product("P1", 10.0, "Keyboard"),
            product("P2", 5.0, "Mouse"),
            product("P3", 2.5, "Cable"),
        ]))
    }

    fn draft(items: &[(&str, i32)]) -> OrderDraft {
        OrderDraft {
            items: items.iter().map(|(id, q)| DraftItem { product_id: id.to_string(), quantity: *q }).collect(),
        }
    }

    #[tokio::test]
    async fn create_computes_totals_from_resolved_prices() {
        let f = fixture();
        let view = f.svc.create(draft(&[("P1", 2), ("P2", 1)])).await.unwrap();
        assert_eq!(view.order.total_amount, 25.0);
        assert_eq!(view.order.total_items, 3);
        assert_eq!(view.order.status, OrderStatus::Pending);
        assert!(!view.order.paid);
        assert_eq!(view.order_items.len(), 2);
        assert_eq!(view.order_items[0].name, "Keyboard");
        assert_eq!(view.order_items[0].price, 10.0);
        assert_eq!(view.order_items[1].name, "Mouse");

        // Matches what was stored
        let (stored, stored_items) = f.repo.find_with_items(view.order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_amount, 25.0);
        let sum: f64 = stored_items.iter().map(|i| i.price * f64::from(i.quantity)).sum();
        assert_eq!(sum, stored.total_amount);
    }

    #[tokio::test]
    async fn create_resolves_distinct_ids_in_one_call() {
        let f = fixture();
        let view = f.svc.create(draft(&[("P1", 1), ("P3", 2), ("P1", 3)])).await.unwrap();
        assert_eq!(view.order.total_items, 6);
        assert_eq!(view.order.total_amount, 45.0);
        assert_eq!(view.order_items.len(), 3);
        assert_eq!(f.products.calls().await, vec![vec!["P1".to_string(), "P3".to_string()]]);
    }

    #[tokio::test]
    async fn create_with_unknown_product_persists_nothing() {
        let f = fixture();
        let err = f.svc.create(draft(&[("P1", 1), ("NOPE", 1)])).await.unwrap_err();
        let (status, msg) = err.tagged().unwrap();
        assert_eq!(status, BAD_REQUEST);
        assert!(msg.contains("NOPE"), "{msg}");
        assert!(f.repo.is_empty().await);
    }

    #[tokio::test]
    async fn create_when_products_unreachable_is_bad_request() {
        let f = fixture_with(StaticProductsClient::unreachable());
        let err = f.svc.create(draft(&[("P1", 1)])).await.unwrap_err();
        let (status, msg) = err.tagged().unwrap();
        assert_eq!(status, BAD_REQUEST);
        assert!(msg.contains("unreachable"), "{msg}");
        assert!(f.repo.is_empty().await);
    }

    #[tokio::test]
    async fn create_persistence_failure_is_bad_request() {
        let f = fixture();
        f.repo.fail_writes(true);
        let err = f.svc.create(draft(&[("P1", 1)])).await.unwrap_err();
        let (status, msg) = err.tagged().unwrap();
        assert_eq!(status, BAD_REQUEST);
        assert!(msg.contains("connection closed"), "{msg}");
        assert!(f.repo.is_empty().await);
    }

    #[tokio::test]
    async fn find_all_second_page_of_fifteen() {
        let f = fixture();
        for _ in 0..15 {
            f.svc.create(draft(&[("P2", 1)])).await.unwrap();
        }
        let filter = OrderFilter { status: None, pagination: Pagination::new(Some(2), Some(10)).unwrap() };
        let page = f.svc.find_all(filter).await.unwrap();
        assert_eq!(page.meta, PageMeta { total: 15, page: 2, last_page: 2, per_page: 10 });
        assert_eq!(page.data.len(), 5);
    }

    #[tokio::test]
    async fn find_all_applies_status_to_count_and_page() {
        let f = fixture();
        let mut ids = vec![];
        for _ in 0..4 {
            ids.push(f.svc.create(draft(&[("P1", 1)])).await.unwrap().order.id);
        }
        f.svc.change_status(StatusChange { id: ids[1], status: OrderStatus::Delivered }).await.unwrap();
        f.svc.change_status(StatusChange { id: ids[3], status: OrderStatus::Delivered }).await.unwrap();

        let filter = OrderFilter { status: Some(OrderStatus::Delivered), pagination: Pagination::new(None, Some(1)).unwrap() };
        let page = f.svc.find_all(filter).await.unwrap();
        assert_eq!(page.meta.total, 2);
        assert_eq!(page.meta.last_page, 2);
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, ids[1]);

        let pending = f.svc.find_all(OrderFilter { status: Some(OrderStatus::Pending), ..Default::default() }).await.unwrap();
        assert_eq!(pending.meta.total, 2);
        assert!(pending.data.iter().all(|o| o.status == OrderStatus::Pending));
    }

    #[tokio::test]
    async fn find_all_on_empty_store() {
        let f = fixture();
        let page = f.svc.find_all(OrderFilter::default()).await.unwrap();
        assert_eq!(page.meta, PageMeta { total: 0, page: 1, last_page: 0, per_page: 10 });
        assert!(page.data.is_empty());
    }

    #[tokio::test]
    async fn find_one_enriches_with_fresh_names() {
        let f = fixture();
        let created = f.svc.create(draft(&[("P1", 1), ("P1", 2), ("P2", 1)])).await.unwrap();
        let found = f.svc.find_one(created.order.id).await.unwrap();
        assert_eq!(found.order.id, created.order.id);
        assert_eq!(found.order_items.len(), 3);
        assert!(found.order_items.iter().all(|i| !i.name.is_empty()));

        let calls = f.products.calls().await;
        assert_eq!(calls.len(), 2);
        let mut lookup = calls[1].clone();
        lookup.sort();
        assert_eq!(lookup, vec!["P1".to_string(), "P2".to_string()]);
    }

    #[tokio::test]
    async fn find_one_unknown_id_is_not_found() {
        let f = fixture();
        let id = Uuid::new_v4();
        let err = f.svc.find_one(id).await.unwrap_err();
        let (status, msg) = err.tagged().unwrap();
        assert_eq!(status, NOT_FOUND);
        assert!(msg.contains(&id.to_string()));
        assert!(f.products.calls().await.is_empty());
    }

    #[tokio::test]
    async fn change_status_to_same_value_is_a_no_op() {
        let f = fixture();
        let created = f.svc.create(draft(&[("P1", 1)])).await.unwrap().order;
        let same = f.svc.change_status(StatusChange { id: created.id, status: OrderStatus::Pending }).await.unwrap();
        assert_eq!(same, created);
        assert_eq!(f.repo.update_calls(), 0);
    }

    #[tokio::test]
    async fn change_status_persists_new_value() {
        let f = fixture();
        let created = f.svc.create(draft(&[("P1", 1)])).await.unwrap().order;
        let paid = f.svc.change_status(StatusChange { id: created.id, status: OrderStatus::Paid }).await.unwrap();
        assert_eq!(paid.status, OrderStatus::Paid);
        assert_eq!(f.repo.update_calls(), 1);
        // Any status may follow any other
        let back = f.svc.change_status(StatusChange { id: created.id, status: OrderStatus::Pending }).await.unwrap();
        assert_eq!(back.status, OrderStatus::Pending);
        assert_eq!(f.repo.update_calls(), 2);
    }

    #[tokio::test]
    async fn change_status_unknown_id_is_not_found() {
        let f = fixture();
        let id = Uuid::new_v4();
        let err = f.svc.change_status(StatusChange { id, status: OrderStatus::Paid }).await.unwrap_err();
        assert_eq!(err.tagged().map(|(s, _)| s), Some(NOT_FOUND));
        assert_eq!(f.repo.update_calls(), 0);
    }
}
