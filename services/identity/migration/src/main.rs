use sea_orm_migration::prelude::*;

mod m20260601_000001_create_users;
mod m20260601_000002_create_provider_links;
mod m20260601_000003_create_passwordless_codes;
mod m20260601_000004_create_outbox_events;
mod m20260601_000005_create_projects;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260601_000001_create_users::Migration),
            Box::new(m20260601_000002_create_provider_links::Migration),
            Box::new(m20260601_000003_create_passwordless_codes::Migration),
            Box::new(m20260601_000004_create_outbox_events::Migration),
            Box::new(m20260601_000005_create_projects::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
