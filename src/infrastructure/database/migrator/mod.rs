//! Database migrations

use sea_orm_migration::prelude::*;

mod m20240601_000001_create_company_groups;
mod m20240601_000002_create_events;
mod m20240601_000003_create_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_company_groups::Migration),
            Box::new(m20240601_000002_create_events::Migration),
            Box::new(m20240601_000003_create_users::Migration),
        ]
    }
}
