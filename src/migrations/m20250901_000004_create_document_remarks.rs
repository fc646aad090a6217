//! Migration: Create document_remarks table

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
                    .table(DocumentRemarks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentRemarks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DocumentRemarks::ApplicationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentRemarks::DocumentName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DocumentRemarks::Remark).text().not_null())
                    .col(
                        ColumnDef::new(DocumentRemarks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DocumentRemarks::Table, DocumentRemarks::ApplicationId)
                            .to(Applications::Table, Applications::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_document_remarks_app_doc")
                    .table(DocumentRemarks::Table)
                    .col(DocumentRemarks::ApplicationId)
                    .col(DocumentRemarks::DocumentName)
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
                    .table(DocumentRemarks::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum DocumentRemarks {
    Table,
    Id,
    #[iden = "application_id"]
    ApplicationId,
    #[iden = "document_name"]
    DocumentName,
    Remark,
    #[iden = "created_at"]
    CreatedAt,
}
