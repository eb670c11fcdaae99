use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Orders: status filter + stable listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_status_created")
                    .table(Orders::Table)
                    .col(Orders::Status)
                    .col(Orders::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // OrderItems: lookup by parent order
        manager
            .create_index(
                Index::create()
                    .name("idx_order_items_order")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_order_items_order").table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_orders_status_created").table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Orders { Table, Status, CreatedAt }

#[derive(DeriveIden)]
enum OrderItems { Table, OrderId }
