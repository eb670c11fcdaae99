use anyhow::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use super::setup_test_db;
use crate::order::{self, OrderStatus};
use crate::order_item::{self, NewOrderItem};

fn items() -> Vec<NewOrderItem> {
    vec![
        NewOrderItem { product_id: "P1".into(), quantity: 2, price: 10.0 },
        NewOrderItem { product_id: "P2".into(), quantity: 1, price: 5.0 },
    ]
}

/// Order and items land together and can be read back
#[tokio::test]
async fn test_create_with_items_and_read_back() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let (created, rows) = order::create_with_items(&db, 25.0, 3, &items()).await?;
    assert_eq!(created.status, OrderStatus::Pending);
    assert!(!created.paid);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.order_id == created.id));

    let (found, found_items) = order::find_with_items(&db, created.id).await?.expect("order exists");
    assert_eq!(found.total_amount, 25.0);
    assert_eq!(found.total_items, 3);
    assert_eq!(found_items.len(), 2);

    // Cleanup (items cascade)
    order::Entity::delete_by_id(created.id).exec(&db).await?;
    let left = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(created.id))
        .count(&db)
        .await?;
    assert_eq!(left, 0);
    Ok(())
}

/// Rows written inside an uncommitted transaction are discarded
#[tokio::test]
async fn test_transaction_rollback_discards_order() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let id = Uuid::new_v4();
    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
    let txn = db.begin().await?;
    order::ActiveModel {
        id: Set(id),
        total_amount: Set(5.0),
        total_items: Set(1),
        status: Set(OrderStatus::Pending),
        paid: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    txn.rollback().await?;

    assert!(order::find(&db, id).await?.is_none());
    Ok(())
}

/// Invalid items are rejected before anything is written
#[tokio::test]
async fn test_create_rejects_invalid_items() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let mut bad = items();
    bad[1].quantity = 0;
    let err = order::create_with_items(&db, 20.0, 2, &bad).await.unwrap_err();
    assert!(matches!(err, crate::errors::ModelError::Validation(_)));
    let err = order::create_with_items(&db, 20.0, 2, &[]).await.unwrap_err();
    assert!(matches!(err, crate::errors::ModelError::Validation(_)));
    Ok(())
}

/// Status filter and paging use the same predicate
#[tokio::test]
async fn test_count_and_page_by_status() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };

    let mut ids = vec![];
    for _ in 0..3 {
        let (o, _) = order::create_with_items(&db, 25.0, 3, &items()).await?;
        ids.push(o.id);
    }
    let first = order::find(&db, ids[0]).await?.expect("exists");
    let delivered = order::set_status(&db, first, OrderStatus::Delivered).await?;
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.updated_at >= delivered.created_at);

    let delivered_total = order::count_by_status(&db, Some(OrderStatus::Delivered)).await?;
    assert!(delivered_total >= 1);
    let page = order::page_by_status(&db, Some(OrderStatus::Delivered), 0, 1000).await?;
    assert!(page.iter().all(|o| o.status == OrderStatus::Delivered));
    assert!(page.iter().any(|o| o.id == ids[0]));

    let one = order::page_by_status(&db, None, 0, 1).await?;
    assert_eq!(one.len(), 1);

    for id in ids {
        order::Entity::delete_by_id(id).exec(&db).await?;
    }
    Ok(())
}

/// Unknown ids resolve to None rather than an error
#[tokio::test]
async fn test_find_missing_returns_none() -> Result<()> {
    let Some(db) = setup_test_db().await? else { return Ok(()) };
    assert!(order::find(&db, Uuid::new_v4()).await?.is_none());
    assert!(order::find_with_items(&db, Uuid::new_v4()).await?.is_none());
    Ok(())
}
