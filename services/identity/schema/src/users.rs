use sea_orm::entity::prelude::*;

/// User account record.
///
/// `email` carries a DB-level UNIQUE constraint — the one-user-per-email
/// invariant is enforced here, not in application code, so concurrent
/// registrations for the same address cannot both win.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub last_name: String,
    pub server_role: i16,
    pub state: i16,
    /// Argon2 hash; present only for accounts with a local password.
    pub password_hash: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::provider_links::Entity")]
    ProviderLinks,
}

impl Related<super::provider_links::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProviderLinks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
