//! Migration: Create verified_files table

use sea_orm_migration::prelude::*;

use super::m20250901_000002_create_applications::Applications;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VerifiedFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VerifiedFiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VerifiedFiles::ApplicationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VerifiedFiles::FileKey).string().not_null())
                    .col(
                        ColumnDef::new(VerifiedFiles::VerifiedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(VerifiedFiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VerifiedFiles::Table, VerifiedFiles::ApplicationId)
                            .to(Applications::Table, Applications::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One verification row per (application, file key)
        manager
            .create_index(
                Index::create()
                    .name("idx_verified_files_unique")
                    .table(VerifiedFiles::Table)
                    .col(VerifiedFiles::ApplicationId)
                    .col(VerifiedFiles::FileKey)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(VerifiedFiles::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum VerifiedFiles {
    Table,
    Id,
    #[iden = "application_id"]
    ApplicationId,
    #[iden = "file_key"]
    FileKey,
    #[iden = "verified_by"]
    VerifiedBy,
    #[iden = "created_at"]
    CreatedAt,
}
