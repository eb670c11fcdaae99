//! Create `orders` table.
//!
//! Aggregate totals are stored alongside the lifecycle status; `status` holds the
//! upper-case enum string (`PENDING`, `PAID`, `DELIVERED`, `CANCELLED`).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(uuid(Orders::Id).primary_key())
                    .col(double(Orders::TotalAmount).not_null())
                    .col(integer(Orders::TotalItems).not_null())
                    .col(string_len(Orders::Status, 16).not_null().default("PENDING"))
                    .col(boolean(Orders::Paid).not_null().default(false))
                    .col(
                        timestamp_with_time_zone(Orders::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Orders::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Orders::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    TotalAmount,
    TotalItems,
    Status,
    Paid,
    CreatedAt,
    UpdatedAt,
}
