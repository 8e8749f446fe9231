use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::Status).small_integer().not_null())
                    .col(
                        ColumnDef::new(Projects::Featured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProjectRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProjectRoles::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(ProjectRoles::UserId).uuid().not_null())
                    .col(ColumnDef::new(ProjectRoles::Role).string().not_null())
                    .col(
                        ColumnDef::new(ProjectRoles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ProjectRoles::ProjectId)
                            .col(ProjectRoles::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ProjectRoles::Table, ProjectRoles::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ProjectRoles::Table)
                    .col(ProjectRoles::UserId)
                    .name("idx_project_roles_user_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProjectStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectStats::ProjectId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProjectStats::TotalEntries)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ProjectStats::Table, ProjectStats::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectStats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    Name,
    Status,
    Featured,
    CreatedAt,
}

#[derive(Iden)]
enum ProjectRoles {
    Table,
    ProjectId,
    UserId,
    Role,
    CreatedAt,
}

#[derive(Iden)]
enum ProjectStats {
    Table,
    ProjectId,
    TotalEntries,
}
