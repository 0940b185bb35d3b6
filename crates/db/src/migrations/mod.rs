//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_auth_tables;
mod m20250101_000002_create_administrative_division_table;
mod m20250101_000003_create_facility_table;
mod m20250101_000004_create_license_table;
mod m20250101_000005_create_activity_log_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_auth_tables::Migration),
            Box::new(m20250101_000002_create_administrative_division_table::Migration),
            Box::new(m20250101_000003_create_facility_table::Migration),
            Box::new(m20250101_000004_create_license_table::Migration),
            Box::new(m20250101_000005_create_activity_log_table::Migration),
        ]
    }
}
