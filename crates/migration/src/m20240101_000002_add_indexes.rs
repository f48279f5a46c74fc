//! Secondary indexes for common lookups (by owner, by name).
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_diagram_owner_id")
                    .table(Diagram::Table)
                    .col(Diagram::OwnerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_diagram_name")
                    .table(Diagram::Table)
                    .col(Diagram::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_diagram_name").table(Diagram::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_diagram_owner_id").table(Diagram::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Diagram { Table, OwnerId, Name }
