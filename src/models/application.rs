use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Overall application status. Stored in canonical title case; inbound
/// values are accepted case-insensitively and normalized before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ApplicationStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Accepted")]
    Accepted,
    #[sea_orm(string_value = "Rejected")]
    Rejected,
}

impl ApplicationStatus {
    /// Parse a client-supplied value, accepting any casing.
    pub fn from_input(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(ApplicationStatus::Pending),
            "accepted" => Some(ApplicationStatus::Accepted),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

/// Per-document review status, stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl DocumentStatus {
    pub fn from_input(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(DocumentStatus::Pending),
            "approved" => Some(DocumentStatus::Approved),
            "rejected" => Some(DocumentStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub program_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub marital_status: Option<String>,
    pub is_business_owner: bool,
    pub business_name: Option<String>,

    // One stored file path per document key
    pub letter_of_intent: Option<String>,
    pub resume: Option<String>,
    pub picture: Option<String>,
    pub application_form: Option<String>,
    pub recommendation_letter: Option<String>,
    pub school_credentials: Option<String>,
    pub high_school_diploma: Option<String>,
    pub transcript: Option<String>,
    pub birth_certificate: Option<String>,
    pub employment_certificate: Option<String>,
    pub nbi_clearance: Option<String>,
    pub marriage_certificate: Option<String>,
    pub business_registration: Option<String>,
    pub certificates: Option<String>,

    // Review columns for the reviewed document subset (schema v1)
    pub letter_of_intent_status: Option<DocumentStatus>,
    pub letter_of_intent_remark: Option<String>,
    pub resume_status: Option<DocumentStatus>,
    pub resume_remark: Option<String>,
    pub picture_status: Option<DocumentStatus>,
    pub picture_remark: Option<String>,
    pub application_form_status: Option<DocumentStatus>,
    pub application_form_remark: Option<String>,
    pub transcript_status: Option<DocumentStatus>,
    pub transcript_remark: Option<String>,
    pub school_credentials_status: Option<DocumentStatus>,
    pub school_credentials_remark: Option<String>,

    pub status: ApplicationStatus,
    pub is_draft: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::verified_file::Entity")]
    VerifiedFiles,
    #[sea_orm(has_many = "super::document_remark::Entity")]
    DocumentRemarks,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::verified_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VerifiedFiles.def()
    }
}

impl Related<super::document_remark::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentRemarks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_status_parse_case_insensitive() {
        assert_eq!(
            ApplicationStatus::from_input("PENDING"),
            Some(ApplicationStatus::Pending)
        );
        assert_eq!(
            ApplicationStatus::from_input("  accepted "),
            Some(ApplicationStatus::Accepted)
        );
        assert_eq!(
            ApplicationStatus::from_input("Rejected"),
            Some(ApplicationStatus::Rejected)
        );
        assert_eq!(ApplicationStatus::from_input("approved"), None);
        assert_eq!(ApplicationStatus::from_input(""), None);
    }

    #[test]
    fn test_application_status_normalizes_to_title_case() {
        assert_eq!(
            ApplicationStatus::from_input("accepted").unwrap().as_str(),
            "Accepted"
        );
        assert_eq!(
            ApplicationStatus::from_input("PENDING").unwrap().as_str(),
            "Pending"
        );
    }

    #[test]
    fn test_document_status_parse() {
        assert_eq!(
            DocumentStatus::from_input("Approved"),
            Some(DocumentStatus::Approved)
        );
        assert_eq!(DocumentStatus::from_input("accepted"), None);
        assert_eq!(DocumentStatus::from_input("pending").unwrap().as_str(), "pending");
    }
}
