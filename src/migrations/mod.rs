pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users;
mod m20250901_000002_create_applications;
mod m20250901_000003_create_verified_files;
mod m20250901_000004_create_document_remarks;
mod m20250901_000005_create_password_resets;
mod m20250901_000006_create_activity_logs;
mod m20250901_000007_create_notification_reads;
mod m20250910_000001_add_document_review_columns;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users::Migration),
            Box::new(m20250901_000002_create_applications::Migration),
            Box::new(m20250901_000003_create_verified_files::Migration),
            Box::new(m20250901_000004_create_document_remarks::Migration),
            Box::new(m20250901_000005_create_password_resets::Migration),
            Box::new(m20250901_000006_create_activity_logs::Migration),
            Box::new(m20250901_000007_create_notification_reads::Migration),
            Box::new(m20250910_000001_add_document_review_columns::Migration),
        ]
    }
}
