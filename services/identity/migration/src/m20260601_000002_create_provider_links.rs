use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProviderLinks::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProviderLinks::UserId).uuid().not_null())
                    .col(ColumnDef::new(ProviderLinks::Provider).string().not_null())
                    .col(ColumnDef::new(ProviderLinks::Email).string().not_null())
                    .col(
                        ColumnDef::new(ProviderLinks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Composite PK doubles as the uniqueness constraint that
                    // makes concurrent first-time linking idempotent.
                    .primary_key(
                        Index::create()
                            .col(ProviderLinks::UserId)
                            .col(ProviderLinks::Provider),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ProviderLinks::Table, ProviderLinks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ProviderLinks::Table)
                    .col(ProviderLinks::Email)
                    .name("idx_provider_links_email")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProviderLinks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProviderLinks {
    Table,
    UserId,
    Provider,
    Email,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
