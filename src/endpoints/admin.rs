use std::collections::BTreeMap;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::HeaderMap,
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::endpoints::profile::{apply_profile_form, parse_profile_form, ProfileResponse};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::application::{self, ApplicationStatus, DocumentStatus};
use crate::models::prelude::*;
use crate::models::{document_remark, verified_file};
use crate::services::activity::{self, ActivityAction, ActivityQuery};
use crate::services::documents::{self, DocumentKey};
use crate::services::uploads::profile_picture_url;
use crate::state::AppState;

/// Create admin routes
pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/applications", get(list_applications))
        .route("/applications/{id}/status", patch(set_application_status))
        .route(
            "/applications/{id}/documents/{key}/status",
            patch(set_document_status),
        )
        .route("/applications/{id}", delete(delete_application))
        .route("/applications/{id}/verify/{file_key}", post(verify_file))
        .route(
            "/applications/{id}/documents/{key}/remark",
            get(get_document_remark).post(add_document_remark),
        )
        .route("/documents/review-keys", get(list_review_keys))
        .route("/dashboard-stats", get(dashboard_stats))
        .route("/activity-logs", get(list_activity_logs))
        .route("/profile", get(get_admin_profile).put(update_admin_profile))
        .layer(DefaultBodyLimit::max(CONFIG.uploads.max_upload_bytes))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// An application row plus the derived `<key>_verified` flag map.
#[derive(Debug, Serialize)]
pub struct ApplicationWithFlags {
    #[serde(flatten)]
    pub application: application::Model,
    #[serde(flatten)]
    pub verified: BTreeMap<String, u8>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct SetDocumentStatusRequest {
    pub status: String,
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemarkRequest {
    pub remark: String,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
    pub deleted: application::Model,
}

// ============================================================================
// Helper Functions
// ============================================================================

async fn find_application(state: &AppState, id: i64) -> Result<application::Model> {
    Application::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
}

async fn with_verified_flags(
    state: &AppState,
    app: application::Model,
) -> Result<ApplicationWithFlags> {
    let verified = documents::verified_keys(&state.db, app.id).await?;
    Ok(ApplicationWithFlags {
        application: app,
        verified: documents::verified_flags(&verified),
    })
}

/// MySQL reports writes against a missing column as an unknown-column error;
/// surface that as a client error instead of a 500.
fn translate_unknown_column(err: sea_orm::DbErr) -> AppError {
    let msg = err.to_string().to_lowercase();
    if msg.contains("unknown column") || msg.contains("no such column") {
        AppError::BadRequest("Document does not support status updates".to_string())
    } else {
        AppError::Database(err)
    }
}

// ============================================================================
// Application Endpoints
// ============================================================================

/// List every submitted application with derived verification flags
async fn list_applications(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<ApplicationWithFlags>>> {
    let apps = Application::find()
        .filter(application::Column::IsDraft.eq(false))
        .order_by_desc(application::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let verified_by_app = documents::verified_keys_by_application(&state.db).await?;
    let empty = Default::default();

    let rows = apps
        .into_iter()
        .map(|app| {
            let verified = verified_by_app.get(&app.id).unwrap_or(&empty);
            ApplicationWithFlags {
                verified: documents::verified_flags(verified),
                application: app,
            }
        })
        .collect();

    Ok(Json(rows))
}

/// Set the overall application status (case-insensitive input, stored title case)
async fn set_application_status(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<application::Model>> {
    let status = ApplicationStatus::from_input(&request.status)
        .ok_or_else(|| AppError::BadRequest("Invalid status value".to_string()))?;

    let app = find_application(&state, id).await?;

    let mut active: application::ActiveModel = app.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    state
        .activity
        .record(
            admin.actor(),
            ActivityAction::UpdateApplicationStatus,
            format!("Set application {} status to {}", id, status.as_str()),
        )
        .await;

    Ok(Json(updated))
}

/// Set the review status of one document.
///
/// Documents outside the reviewed subset carry no review columns; the
/// update degrades to a no-op returning the unchanged row.
async fn set_document_status(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path((id, key)): Path<(i64, String)>,
    Json(request): Json<SetDocumentStatusRequest>,
) -> Result<Json<application::Model>> {
    let document = DocumentKey::parse(&key)
        .ok_or_else(|| AppError::BadRequest("Invalid document name".to_string()))?;
    let status = DocumentStatus::from_input(&request.status)
        .ok_or_else(|| AppError::BadRequest("Invalid status value".to_string()))?;

    let app = find_application(&state, id).await?;

    let (status_col, remark_col) = match document.review_columns() {
        Some(columns) => columns,
        None => return Ok(Json(app)),
    };

    let mut active: application::ActiveModel = app.into();
    active.set(status_col, status.as_str().into());
    active.set(remark_col, request.remark.clone().into());
    active.updated_at = Set(Utc::now());
    let updated = active
        .update(&state.db)
        .await
        .map_err(translate_unknown_column)?;

    state
        .activity
        .record(
            admin.actor(),
            ActivityAction::UpdateDocumentStatus,
            format!(
                "Updated document '{}' status to '{}' on application {}",
                document.as_str(),
                status.as_str(),
                id
            ),
        )
        .await;

    Ok(Json(updated))
}

/// Delete an application and return the deleted snapshot
async fn delete_application(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>> {
    let app = find_application(&state, id).await?;
    let snapshot = app.clone();

    app.delete(&state.db).await?;

    state
        .activity
        .record(
            admin.actor(),
            ActivityAction::DeleteApplication,
            format!("Deleted application {}", id),
        )
        .await;

    Ok(Json(DeletedResponse {
        message: "Application deleted".to_string(),
        deleted: snapshot,
    }))
}

/// Set or clear a document's verification marker.
///
/// The `verified` flag is required: true inserts the marker when absent
/// (idempotent), false removes it. The response always carries the full
/// recomputed flag map.
async fn verify_file(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path((id, file_key)): Path<(i64, String)>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<ApplicationWithFlags>> {
    let document = DocumentKey::parse(&file_key)
        .ok_or_else(|| AppError::BadRequest("Invalid document name".to_string()))?;

    let verified_flag = body
        .get("verified")
        .and_then(|v| v.as_bool().or_else(|| v.as_i64().map(|n| n == 1)))
        .ok_or_else(|| AppError::BadRequest("verified flag is required".to_string()))?;

    let app = find_application(&state, id).await?;

    if verified_flag {
        let exists = VerifiedFile::find()
            .filter(verified_file::Column::ApplicationId.eq(id))
            .filter(verified_file::Column::FileKey.eq(document.as_str()))
            .one(&state.db)
            .await?;

        if exists.is_none() {
            let row = verified_file::ActiveModel {
                application_id: Set(id),
                file_key: Set(document.as_str().to_string()),
                verified_by: Set(Some(admin.user_id())),
                created_at: Set(Utc::now()),
                ..Default::default()
            };
            row.insert(&state.db).await?;

            state
                .activity
                .record(
                    admin.actor(),
                    ActivityAction::VerifyFile,
                    format!(
                        "Verified file '{}' for application {}",
                        document.as_str(),
                        id
                    ),
                )
                .await;
        }
    } else {
        VerifiedFile::delete_many()
            .filter(verified_file::Column::ApplicationId.eq(id))
            .filter(verified_file::Column::FileKey.eq(document.as_str()))
            .exec(&state.db)
            .await?;

        state
            .activity
            .record(
                admin.actor(),
                ActivityAction::UnverifyFile,
                format!(
                    "Un-verified file '{}' for application {}",
                    document.as_str(),
                    id
                ),
            )
            .await;
    }

    let response = with_verified_flags(&state, app).await?;
    Ok(Json(response))
}

// ============================================================================
// Document Remarks
// ============================================================================

/// Latest remark for one document, or an empty placeholder
async fn get_document_remark(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path((id, key)): Path<(i64, String)>,
) -> Result<Json<serde_json::Value>> {
    let document = DocumentKey::parse(&key)
        .ok_or_else(|| AppError::BadRequest("Invalid document name".to_string()))?;

    let latest = DocumentRemark::find()
        .filter(document_remark::Column::ApplicationId.eq(id))
        .filter(document_remark::Column::DocumentName.eq(document.as_str()))
        .order_by_desc(document_remark::Column::CreatedAt)
        .one(&state.db)
        .await?;

    match latest {
        Some(remark) => Ok(Json(serde_json::json!({
            "remark": remark.remark,
            "created_at": remark.created_at,
        }))),
        None => Ok(Json(serde_json::json!({
            "remark": "",
            "created_at": null,
        }))),
    }
}

/// Append a remark to a document's thread
async fn add_document_remark(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path((id, key)): Path<(i64, String)>,
    Json(request): Json<RemarkRequest>,
) -> Result<Json<document_remark::Model>> {
    let document = DocumentKey::parse(&key)
        .ok_or_else(|| AppError::BadRequest("Invalid document name".to_string()))?;
    if request.remark.trim().is_empty() {
        return Err(AppError::BadRequest("Remark is required".to_string()));
    }

    // The remark must attach to an existing application
    find_application(&state, id).await?;

    let entry = document_remark::ActiveModel {
        application_id: Set(id),
        document_name: Set(document.as_str().to_string()),
        remark: Set(request.remark.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let created = entry.insert(&state.db).await?;

    state
        .activity
        .record(
            admin.actor(),
            ActivityAction::AddDocumentRemark,
            format!(
                "Added remark for document '{}' on application {}: {}",
                document.as_str(),
                id,
                request.remark
            ),
        )
        .await;

    Ok(Json(created))
}

/// Document keys carrying review columns in this deployment
async fn list_review_keys(_admin: RequireAdmin) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "supported": documents::review_keys() }))
}

// ============================================================================
// Dashboard Statistics
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProgramCount {
    pub program: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct MonthCount {
    pub month: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_applicants: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub pending_verifications: u64,
    pub incomplete_requirements: u64,
    pub docs_awaiting: u64,
    pub program_distribution: Vec<ProgramCount>,
    pub monthly_applicants: Vec<MonthCount>,
}

/// Aggregate counts for the admin dashboard
async fn dashboard_stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<DashboardStats>> {
    let apps = Application::find()
        .filter(application::Column::IsDraft.eq(false))
        .all(&state.db)
        .await?;

    let verified_by_app = documents::verified_keys_by_application(&state.db).await?;

    let mut accepted = 0;
    let mut rejected = 0;
    let mut pending = 0;
    let mut incomplete_requirements = 0;
    let mut docs_awaiting = 0;
    let mut programs: BTreeMap<String, u64> = BTreeMap::new();
    let mut months: BTreeMap<String, u64> = BTreeMap::new();

    let core_keys = [
        DocumentKey::LetterOfIntent,
        DocumentKey::Resume,
        DocumentKey::Picture,
    ];

    for app in &apps {
        match app.status {
            ApplicationStatus::Accepted => accepted += 1,
            ApplicationStatus::Rejected => rejected += 1,
            ApplicationStatus::Pending => pending += 1,
        }

        let verified = verified_by_app.get(&app.id);
        let any_unverified = core_keys.iter().any(|k| {
            verified
                .map(|set| !set.contains(k.as_str()))
                .unwrap_or(true)
        });
        if any_unverified {
            incomplete_requirements += 1;
        }

        if app.letter_of_intent_status.is_none()
            || app.resume_status.is_none()
            || app.picture_status.is_none()
        {
            docs_awaiting += 1;
        }

        *programs.entry(app.program_name.clone()).or_insert(0) += 1;
        *months
            .entry(app.created_at.format("%Y-%m").to_string())
            .or_insert(0) += 1;
    }

    Ok(Json(DashboardStats {
        total_applicants: apps.len() as u64,
        accepted,
        rejected,
        pending_verifications: pending,
        incomplete_requirements,
        docs_awaiting,
        program_distribution: programs
            .into_iter()
            .map(|(program, count)| ProgramCount { program, count })
            .collect(),
        monthly_applicants: months
            .into_iter()
            .map(|(month, count)| MonthCount { month, count })
            .collect(),
    }))
}

// ============================================================================
// Activity Logs
// ============================================================================

/// List activity logs with filtering and pagination
async fn list_activity_logs(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<activity::ActivityPage>> {
    let page = activity::list_activity(&state.db, query).await?;
    Ok(Json(page))
}

// ============================================================================
// Admin Profile
// ============================================================================

/// Get the calling admin's profile
async fn get_admin_profile(
    State(state): State<AppState>,
    admin: RequireAdmin,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>> {
    let found = User::find_by_id(admin.user_id())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".to_string()))?;

    Ok(Json(ProfileResponse {
        id: found.id,
        fullname: found.fullname.clone(),
        email: found.email.clone(),
        profile_picture: profile_picture_url(&headers, found.profile_picture.as_deref()),
    }))
}

/// Update the calling admin's profile (multipart form)
async fn update_admin_profile(
    State(state): State<AppState>,
    admin: RequireAdmin,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let form = parse_profile_form(multipart).await?;
    let updated = apply_profile_form(&state, admin.user(), form).await?;

    state
        .activity
        .record(
            admin.actor(),
            ActivityAction::UpdateProfile,
            "Admin updated profile settings",
        )
        .await;

    Ok(Json(serde_json::json!({
        "message": "Profile updated successfully!",
        "user": ProfileResponse {
            id: updated.id,
            fullname: updated.fullname.clone(),
            email: updated.email.clone(),
            profile_picture: profile_picture_url(&headers, updated.profile_picture.as_deref()),
        },
    })))
}
