//! Migration: Add per-document review columns (review schema v1)
//!
//! The reviewed subset is fixed by this schema version and mirrored by the
//! static registry in `services::documents`. Documents outside the subset
//! have no review columns; status updates for them are a no-op.

use sea_orm_migration::prelude::*;

use super::m20250901_000002_create_applications::Applications;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum ReviewColumns {
    #[iden = "letter_of_intent_status"]
    LetterOfIntentStatus,
    #[iden = "letter_of_intent_remark"]
    LetterOfIntentRemark,
    #[iden = "resume_status"]
    ResumeStatus,
    #[iden = "resume_remark"]
    ResumeRemark,
    #[iden = "picture_status"]
    PictureStatus,
    #[iden = "picture_remark"]
    PictureRemark,
    #[iden = "application_form_status"]
    ApplicationFormStatus,
    #[iden = "application_form_remark"]
    ApplicationFormRemark,
    #[iden = "transcript_status"]
    TranscriptStatus,
    #[iden = "transcript_remark"]
    TranscriptRemark,
    #[iden = "school_credentials_status"]
    SchoolCredentialsStatus,
    #[iden = "school_credentials_remark"]
    SchoolCredentialsRemark,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let status_columns = [
            ReviewColumns::LetterOfIntentStatus,
            ReviewColumns::ResumeStatus,
            ReviewColumns::PictureStatus,
            ReviewColumns::ApplicationFormStatus,
            ReviewColumns::TranscriptStatus,
            ReviewColumns::SchoolCredentialsStatus,
        ];
        let remark_columns = [
            ReviewColumns::LetterOfIntentRemark,
            ReviewColumns::ResumeRemark,
            ReviewColumns::PictureRemark,
            ReviewColumns::ApplicationFormRemark,
            ReviewColumns::TranscriptRemark,
            ReviewColumns::SchoolCredentialsRemark,
        ];

        for col in status_columns {
            manager
                .alter_table(
                    Table::alter()
                        .table(Applications::Table)
                        .add_column(ColumnDef::new(col).string_len(16).null())
                        .to_owned(),
                )
                .await?;
        }

        for col in remark_columns {
            manager
                .alter_table(
                    Table::alter()
                        .table(Applications::Table)
                        .add_column(ColumnDef::new(col).text().null())
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let columns = [
            ReviewColumns::LetterOfIntentStatus,
            ReviewColumns::LetterOfIntentRemark,
            ReviewColumns::ResumeStatus,
            ReviewColumns::ResumeRemark,
            ReviewColumns::PictureStatus,
            ReviewColumns::PictureRemark,
            ReviewColumns::ApplicationFormStatus,
            ReviewColumns::ApplicationFormRemark,
            ReviewColumns::TranscriptStatus,
            ReviewColumns::TranscriptRemark,
            ReviewColumns::SchoolCredentialsStatus,
            ReviewColumns::SchoolCredentialsRemark,
        ];

        for col in columns {
            manager
                .alter_table(
                    Table::alter()
                        .table(Applications::Table)
                        .drop_column(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
