//! Create `diagram` table.
//!
//! One row per diagram; payload bytes live in the blob store under
//! `object_key`, never in this table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Diagram::Table)
                    .if_not_exists()
                    .col(uuid(Diagram::Id).primary_key())
                    .col(string_len(Diagram::Name, 256).not_null())
                    .col(uuid(Diagram::OwnerId).not_null())
                    .col(string_len(Diagram::ObjectKey, 512).not_null())
                    .col(timestamp_with_time_zone(Diagram::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Diagram::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Diagram::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Diagram { Table, Id, Name, OwnerId, ObjectKey, CreatedAt, UpdatedAt }
