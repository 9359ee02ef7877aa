use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(KvEntry::Table)
                    .if_not_exists()
                    .col(string(KvEntry::Key).primary_key())
                    .col(text(KvEntry::Value))
                    .col(timestamp(KvEntry::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(KvEntry::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum KvEntry {
    Table,
    Key,
    Value,
    UpdatedAt,
}
