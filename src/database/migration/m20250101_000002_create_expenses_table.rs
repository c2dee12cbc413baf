use super::{Expenses, Users};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(Expenses::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Expenses::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Expenses::UserId).integer().not_null())
            .col(ColumnDef::new(Expenses::Amount).decimal_len(12, 2).not_null())
            .col(ColumnDef::new(Expenses::Category).string_len(16).not_null())
            .col(ColumnDef::new(Expenses::Description).string_len(500).null())
            .col(
                ColumnDef::new(Expenses::Date)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Expenses::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Expenses::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            );

        // SQLite only accepts foreign keys declared inline at table creation
        table.foreign_key(
            ForeignKey::create()
                .name("fk_expenses_user_id")
                .from(Expenses::Table, Expenses::UserId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        );

        manager.create_table(table.to_owned()).await?;

        // Composite index for per-user date range scans
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_expenses_user_date")
                    .table(Expenses::Table)
                    .col(Expenses::UserId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_expenses_user_category")
                    .table(Expenses::Table)
                    .col(Expenses::UserId)
                    .col(Expenses::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await
    }
}
