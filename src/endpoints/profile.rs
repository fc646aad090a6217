use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::HeaderMap,
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::middleware::Authenticated;
use crate::models::application::{self, ApplicationStatus};
use crate::models::prelude::*;
use crate::models::{document_remark, user};
use crate::services::activity::ActivityAction;
use crate::services::documents;
use crate::services::security::hash_password;
use crate::services::uploads::{
    profile_picture_url, require_image, save_upload, UploadKind,
};
use crate::state::AppState;

/// Create profile routes (applicant self-service)
pub fn profile_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_profile))
        .route("/update", put(update_profile))
        .route("/picture", put(update_picture))
        .route("/delete", delete(delete_account))
        .route("/applications", get(my_applications))
        .route("/applications/{id}", get(application_detail))
        .route("/drafts", post(create_draft))
        .route("/drafts/{id}", put(update_draft).delete(delete_draft))
        .route("/drafts/{id}/submit", post(submit_draft))
        .layer(DefaultBodyLimit::max(CONFIG.uploads.max_upload_bytes))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub fullname: String,
    pub email: String,
    pub profile_picture: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationSummary {
    pub id: i64,
    pub program_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: ApplicationStatus,
    pub is_draft: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<application::Model> for ApplicationSummary {
    fn from(app: application::Model) -> Self {
        Self {
            id: app.id,
            program_name: app.program_name,
            full_name: app.full_name,
            email: app.email,
            phone: app.phone,
            status: app.status,
            is_draft: app.is_draft,
            created_at: app.created_at,
            updated_at: app.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemarkEntry {
    pub remark: String,
    pub date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub program_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub marital_status: Option<String>,
    #[serde(default)]
    pub is_business_owner: bool,
    pub business_name: Option<String>,
}

// ============================================================================
// Multipart Form Handling
// ============================================================================

/// Parsed fields of a profile-update multipart form.
#[derive(Default)]
pub(crate) struct ProfileForm {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub picture: Option<(String, Vec<u8>)>,
}

pub(crate) async fn parse_profile_form(mut multipart: Multipart) -> Result<ProfileForm> {
    let mut form = ProfileForm::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "fullname" => form.fullname = Some(field.text().await?),
            "email" => form.email = Some(field.text().await?),
            "password" => form.password = Some(field.text().await?),
            "profile_picture" => {
                let content_type = field.content_type().map(|s| s.to_string());
                require_image(content_type.as_deref())?;
                let name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await?.to_vec();
                form.picture = Some((name, data));
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Apply a parsed profile form to a user row and return the updated row.
pub(crate) async fn apply_profile_form(
    state: &AppState,
    current: &user::Model,
    form: ProfileForm,
) -> Result<user::Model> {
    let mut active: user::ActiveModel = current.clone().into();

    if let Some(fullname) = form.fullname {
        active.fullname = Set(fullname.trim().to_string());
    }
    if let Some(email) = form.email {
        active.email = Set(email.trim().to_string());
    }
    if let Some(password) = form.password {
        if !password.trim().is_empty() {
            active.password = Set(Some(hash_password(&password)?));
        }
    }
    if let Some((name, data)) = form.picture {
        let path = save_upload(UploadKind::Profile, &name, &data).await?;
        active.profile_picture = Set(Some(path));
    }

    active.updated_at = Set(Utc::now());
    Ok(active.update(&state.db).await?)
}

// ============================================================================
// Profile Endpoints
// ============================================================================

/// Get the caller's profile
async fn get_profile(
    State(state): State<AppState>,
    auth: Authenticated,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>> {
    let found = User::find_by_id(auth.user_id())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        id: found.id,
        fullname: found.fullname.clone(),
        email: found.email.clone(),
        profile_picture: profile_picture_url(&headers, found.profile_picture.as_deref()),
    }))
}

/// Update the caller's profile (multipart form)
async fn update_profile(
    State(state): State<AppState>,
    auth: Authenticated,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let form = parse_profile_form(multipart).await?;

    let missing = |s: &Option<String>| s.as_deref().map(str::trim).unwrap_or("").is_empty();
    if missing(&form.fullname) || missing(&form.email) {
        return Err(AppError::BadRequest(
            "Fullname and email required".to_string(),
        ));
    }

    let fullname = form.fullname.clone().unwrap_or_default();
    let email = form.email.clone().unwrap_or_default();
    let updated = apply_profile_form(&state, auth.user(), form).await?;

    state
        .activity
        .record(
            auth.actor(),
            ActivityAction::UpdateProfile,
            format!("Updated profile info: fullname={}, email={}", fullname, email),
        )
        .await;

    Ok(Json(serde_json::json!({
        "message": "Profile updated!",
        "user": ProfileResponse {
            id: updated.id,
            fullname: updated.fullname.clone(),
            email: updated.email.clone(),
            profile_picture: profile_picture_url(&headers, updated.profile_picture.as_deref()),
        },
    })))
}

/// Update only the caller's profile picture
async fn update_picture(
    State(state): State<AppState>,
    auth: Authenticated,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let form = parse_profile_form(multipart).await?;
    if form.picture.is_none() {
        return Err(AppError::BadRequest("No file uploaded".to_string()));
    }

    let picture_only = ProfileForm {
        picture: form.picture,
        ..Default::default()
    };
    let updated = apply_profile_form(&state, auth.user(), picture_only).await?;

    state
        .activity
        .record(
            auth.actor(),
            ActivityAction::UpdateProfilePicture,
            "Updated profile picture",
        )
        .await;

    Ok(Json(serde_json::json!({
        "message": "Profile picture updated!",
        "user": ProfileResponse {
            id: updated.id,
            fullname: updated.fullname.clone(),
            email: updated.email.clone(),
            profile_picture: profile_picture_url(&headers, updated.profile_picture.as_deref()),
        },
    })))
}

/// Delete the caller's account (related rows cascade)
async fn delete_account(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<serde_json::Value>> {
    let actor = auth.actor();

    let found = User::find_by_id(auth.user_id())
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    found.delete(&state.db).await?;

    state
        .activity
        .record(actor, ActivityAction::DeleteAccount, "Deleted their account")
        .await;

    Ok(Json(serde_json::json!({ "message": "Account deleted!" })))
}

// ============================================================================
// Application Listing
// ============================================================================

/// List the caller's applications, newest first
async fn my_applications(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Vec<ApplicationSummary>>> {
    let apps = Application::find()
        .filter(application::Column::UserId.eq(auth.user_id()))
        .order_by_desc(application::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(apps.into_iter().map(ApplicationSummary::from).collect()))
}

/// One application with the latest remark per document and verification flags
async fn application_detail(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let app = Application::find_by_id(id)
        .filter(application::Column::UserId.eq(auth.user_id()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    // Rows arrive newest first, so the first row per document wins
    let remark_rows = DocumentRemark::find()
        .filter(document_remark::Column::ApplicationId.eq(app.id))
        .order_by_desc(document_remark::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let mut latest_remarks: std::collections::BTreeMap<String, RemarkEntry> = Default::default();
    for row in remark_rows {
        latest_remarks.entry(row.document_name).or_insert(RemarkEntry {
            remark: row.remark,
            date: row.created_at,
        });
    }

    let verified = documents::verified_keys(&state.db, app.id).await?;

    Ok(Json(serde_json::json!({
        "application": app,
        "remarks": latest_remarks,
        "verified": documents::verified_flags(&verified),
    })))
}

// ============================================================================
// Draft Management
// ============================================================================

async fn find_own_draft(
    state: &AppState,
    user_id: i64,
    id: i64,
) -> Result<application::Model> {
    Application::find_by_id(id)
        .filter(application::Column::UserId.eq(user_id))
        .filter(application::Column::IsDraft.eq(true))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Draft not found".to_string()))
}

/// Create a draft application
async fn create_draft(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(request): Json<DraftRequest>,
) -> Result<Json<application::Model>> {
    if request.program_name.trim().is_empty() || request.full_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Program name and full name are required".to_string(),
        ));
    }

    let now = Utc::now();
    let draft = application::ActiveModel {
        user_id: Set(auth.user_id()),
        program_name: Set(request.program_name.trim().to_string()),
        full_name: Set(request.full_name.trim().to_string()),
        email: Set(request.email.trim().to_string()),
        phone: Set(request.phone),
        marital_status: Set(request.marital_status),
        is_business_owner: Set(request.is_business_owner),
        business_name: Set(request.business_name),
        status: Set(ApplicationStatus::Pending),
        is_draft: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = draft.insert(&state.db).await?;

    state
        .activity
        .record(
            auth.actor(),
            ActivityAction::CreateDraft,
            format!("Created draft application {}", created.id),
        )
        .await;

    Ok(Json(created))
}

/// Update a draft's applicant fields
async fn update_draft(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<i64>,
    Json(request): Json<DraftRequest>,
) -> Result<Json<application::Model>> {
    let draft = find_own_draft(&state, auth.user_id(), id).await?;

    let mut active: application::ActiveModel = draft.into();
    active.program_name = Set(request.program_name.trim().to_string());
    active.full_name = Set(request.full_name.trim().to_string());
    active.email = Set(request.email.trim().to_string());
    active.phone = Set(request.phone);
    active.marital_status = Set(request.marital_status);
    active.is_business_owner = Set(request.is_business_owner);
    active.business_name = Set(request.business_name);
    active.updated_at = Set(Utc::now());
    let updated = active.update(&state.db).await?;

    state
        .activity
        .record(
            auth.actor(),
            ActivityAction::UpdateDraft,
            format!("Updated draft application {}", id),
        )
        .await;

    Ok(Json(updated))
}

/// Finalize a draft: it becomes a pending application visible to admins
async fn submit_draft(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<application::Model>> {
    let draft = find_own_draft(&state, auth.user_id(), id).await?;

    let mut active: application::ActiveModel = draft.into();
    active.is_draft = Set(false);
    active.status = Set(ApplicationStatus::Pending);
    active.updated_at = Set(Utc::now());
    let submitted = active.update(&state.db).await?;

    state
        .activity
        .record(
            auth.actor(),
            ActivityAction::SubmitApplication,
            format!("Submitted application {}", id),
        )
        .await;

    Ok(Json(submitted))
}

/// Discard a draft
async fn delete_draft(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let draft = find_own_draft(&state, auth.user_id(), id).await?;
    draft.delete(&state.db).await?;

    state
        .activity
        .record(
            auth.actor(),
            ActivityAction::DeleteDraft,
            format!("Deleted draft application {}", id),
        )
        .await;

    Ok(Json(serde_json::json!({ "message": "Draft deleted" })))
}
