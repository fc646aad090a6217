//! Migration: Create applications table
//!
//! One nullable file-path column per document key. Per-document review
//! columns are added by a later schema-version migration.

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
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Applications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Applications::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Applications::ProgramName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Applications::FullName).string().not_null())
                    .col(ColumnDef::new(Applications::Email).string().not_null())
                    .col(ColumnDef::new(Applications::Phone).string().null())
                    .col(ColumnDef::new(Applications::MaritalStatus).string().null())
                    .col(
                        ColumnDef::new(Applications::IsBusinessOwner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Applications::BusinessName).string().null())
                    .col(ColumnDef::new(Applications::LetterOfIntent).string().null())
                    .col(ColumnDef::new(Applications::Resume).string().null())
                    .col(ColumnDef::new(Applications::Picture).string().null())
                    .col(
                        ColumnDef::new(Applications::ApplicationForm)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Applications::RecommendationLetter)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Applications::SchoolCredentials)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Applications::HighSchoolDiploma)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(Applications::Transcript).string().null())
                    .col(
                        ColumnDef::new(Applications::BirthCertificate)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Applications::EmploymentCertificate)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(Applications::NbiClearance).string().null())
                    .col(
                        ColumnDef::new(Applications::MarriageCertificate)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Applications::BusinessRegistration)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(Applications::Certificates).string().null())
                    .col(
                        ColumnDef::new(Applications::Status)
                            .string_len(16)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(Applications::IsDraft)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Applications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Applications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Applications::Table, Applications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applications_user")
                    .table(Applications::Table)
                    .col(Applications::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applications_status")
                    .table(Applications::Table)
                    .col(Applications::Status)
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
                    .table(Applications::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum Applications {
    Table,
    Id,
    #[iden = "user_id"]
    UserId,
    #[iden = "program_name"]
    ProgramName,
    #[iden = "full_name"]
    FullName,
    Email,
    Phone,
    #[iden = "marital_status"]
    MaritalStatus,
    #[iden = "is_business_owner"]
    IsBusinessOwner,
    #[iden = "business_name"]
    BusinessName,
    #[iden = "letter_of_intent"]
    LetterOfIntent,
    Resume,
    Picture,
    #[iden = "application_form"]
    ApplicationForm,
    #[iden = "recommendation_letter"]
    RecommendationLetter,
    #[iden = "school_credentials"]
    SchoolCredentials,
    #[iden = "high_school_diploma"]
    HighSchoolDiploma,
    Transcript,
    #[iden = "birth_certificate"]
    BirthCertificate,
    #[iden = "employment_certificate"]
    EmploymentCertificate,
    #[iden = "nbi_clearance"]
    NbiClearance,
    #[iden = "marriage_certificate"]
    MarriageCertificate,
    #[iden = "business_registration"]
    BusinessRegistration,
    Certificates,
    Status,
    #[iden = "is_draft"]
    IsDraft,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
