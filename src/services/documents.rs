//! Document key registry and verified-file overlay.
//!
//! The 14 document keys are a fixed whitelist; any column access derived
//! from client input goes through [`DocumentKey`] so arbitrary names never
//! reach the query layer. The reviewed subset (keys carrying a
//! `<key>_status`/`<key>_remark` column pair) is a versioned, statically
//! known configuration mirroring the review-columns migration.

use std::collections::{BTreeMap, HashMap, HashSet};

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::error::Result;
use crate::models::application;
use crate::models::prelude::VerifiedFile;
use crate::models::verified_file;

/// One of the fixed set of documents an application can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    LetterOfIntent,
    Resume,
    Picture,
    ApplicationForm,
    RecommendationLetter,
    SchoolCredentials,
    HighSchoolDiploma,
    Transcript,
    BirthCertificate,
    EmploymentCertificate,
    NbiClearance,
    MarriageCertificate,
    BusinessRegistration,
    Certificates,
}

impl DocumentKey {
    pub const ALL: [DocumentKey; 14] = [
        DocumentKey::LetterOfIntent,
        DocumentKey::Resume,
        DocumentKey::Picture,
        DocumentKey::ApplicationForm,
        DocumentKey::RecommendationLetter,
        DocumentKey::SchoolCredentials,
        DocumentKey::HighSchoolDiploma,
        DocumentKey::Transcript,
        DocumentKey::BirthCertificate,
        DocumentKey::EmploymentCertificate,
        DocumentKey::NbiClearance,
        DocumentKey::MarriageCertificate,
        DocumentKey::BusinessRegistration,
        DocumentKey::Certificates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKey::LetterOfIntent => "letter_of_intent",
            DocumentKey::Resume => "resume",
            DocumentKey::Picture => "picture",
            DocumentKey::ApplicationForm => "application_form",
            DocumentKey::RecommendationLetter => "recommendation_letter",
            DocumentKey::SchoolCredentials => "school_credentials",
            DocumentKey::HighSchoolDiploma => "high_school_diploma",
            DocumentKey::Transcript => "transcript",
            DocumentKey::BirthCertificate => "birth_certificate",
            DocumentKey::EmploymentCertificate => "employment_certificate",
            DocumentKey::NbiClearance => "nbi_clearance",
            DocumentKey::MarriageCertificate => "marriage_certificate",
            DocumentKey::BusinessRegistration => "business_registration",
            DocumentKey::Certificates => "certificates",
        }
    }

    /// Parse a client-supplied document name against the whitelist.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// The column storing this document's file path.
    pub fn file_column(&self) -> application::Column {
        match self {
            DocumentKey::LetterOfIntent => application::Column::LetterOfIntent,
            DocumentKey::Resume => application::Column::Resume,
            DocumentKey::Picture => application::Column::Picture,
            DocumentKey::ApplicationForm => application::Column::ApplicationForm,
            DocumentKey::RecommendationLetter => application::Column::RecommendationLetter,
            DocumentKey::SchoolCredentials => application::Column::SchoolCredentials,
            DocumentKey::HighSchoolDiploma => application::Column::HighSchoolDiploma,
            DocumentKey::Transcript => application::Column::Transcript,
            DocumentKey::BirthCertificate => application::Column::BirthCertificate,
            DocumentKey::EmploymentCertificate => application::Column::EmploymentCertificate,
            DocumentKey::NbiClearance => application::Column::NbiClearance,
            DocumentKey::MarriageCertificate => application::Column::MarriageCertificate,
            DocumentKey::BusinessRegistration => application::Column::BusinessRegistration,
            DocumentKey::Certificates => application::Column::Certificates,
        }
    }

    /// The (status, remark) column pair for this document, when it belongs
    /// to the reviewed subset of the current review schema version. `None`
    /// means the document carries no review columns and status updates
    /// degrade to a no-op.
    pub fn review_columns(&self) -> Option<(application::Column, application::Column)> {
        match self {
            DocumentKey::LetterOfIntent => Some((
                application::Column::LetterOfIntentStatus,
                application::Column::LetterOfIntentRemark,
            )),
            DocumentKey::Resume => Some((
                application::Column::ResumeStatus,
                application::Column::ResumeRemark,
            )),
            DocumentKey::Picture => Some((
                application::Column::PictureStatus,
                application::Column::PictureRemark,
            )),
            DocumentKey::ApplicationForm => Some((
                application::Column::ApplicationFormStatus,
                application::Column::ApplicationFormRemark,
            )),
            DocumentKey::Transcript => Some((
                application::Column::TranscriptStatus,
                application::Column::TranscriptRemark,
            )),
            DocumentKey::SchoolCredentials => Some((
                application::Column::SchoolCredentialsStatus,
                application::Column::SchoolCredentialsRemark,
            )),
            _ => None,
        }
    }

    pub fn is_reviewed(&self) -> bool {
        self.review_columns().is_some()
    }
}

/// Document keys carrying review columns in the current schema version.
pub fn review_keys() -> Vec<&'static str> {
    DocumentKey::ALL
        .iter()
        .filter(|k| k.is_reviewed())
        .map(|k| k.as_str())
        .collect()
}

/// The set of verified file keys for one application.
pub async fn verified_keys<C: ConnectionTrait>(
    db: &C,
    application_id: i64,
) -> Result<HashSet<String>> {
    let rows = VerifiedFile::find()
        .filter(verified_file::Column::ApplicationId.eq(application_id))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|r| r.file_key).collect())
}

/// Verified file keys grouped by application id, for list endpoints.
pub async fn verified_keys_by_application<C: ConnectionTrait>(
    db: &C,
) -> Result<HashMap<i64, HashSet<String>>> {
    let rows = VerifiedFile::find().all(db).await?;

    let mut map: HashMap<i64, HashSet<String>> = HashMap::new();
    for row in rows {
        map.entry(row.application_id).or_default().insert(row.file_key);
    }
    Ok(map)
}

/// Build the explicit `<key>_verified` flag map: every known key is present,
/// 1 when a VerifiedFile row exists and 0 otherwise.
pub fn verified_flags(verified: &HashSet<String>) -> BTreeMap<String, u8> {
    DocumentKey::ALL
        .iter()
        .map(|k| {
            let flag = u8::from(verified.contains(k.as_str()));
            (format!("{}_verified", k.as_str()), flag)
        })
        .collect()
}
