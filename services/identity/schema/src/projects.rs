use sea_orm::entity::prelude::*;

/// Project record, read (and archived/deleted) during account deletion.
/// Project CRUD itself lives outside the identity service.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub status: i16,
    /// Featured projects need manual handling before any deletion/archival.
    pub featured: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_roles::Entity")]
    ProjectRoles,
    #[sea_orm(has_one = "super::project_stats::Entity")]
    ProjectStats,
}

impl Related<super::project_roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectRoles.def()
    }
}

impl Related<super::project_stats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectStats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
