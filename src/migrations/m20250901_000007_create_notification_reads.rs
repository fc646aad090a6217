//! Migration: Create notification_reads table

use sea_orm_migration::prelude::*;

use super::m20250901_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationReads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationReads::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationReads::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationReads::NotificationKey)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationReads::ReadAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(NotificationReads::Table, NotificationReads::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Mark-read is an idempotent upsert on this pair
        manager
            .create_index(
                Index::create()
                    .name("idx_notification_reads_unique")
                    .table(NotificationReads::Table)
                    .col(NotificationReads::UserId)
                    .col(NotificationReads::NotificationKey)
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
                    .table(NotificationReads::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum NotificationReads {
    Table,
    Id,
    #[iden = "user_id"]
    UserId,
    #[iden = "notification_key"]
    NotificationKey,
    #[iden = "read_at"]
    ReadAt,
}
