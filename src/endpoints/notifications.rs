use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;

use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::middleware::Authenticated;
use crate::models::application;
use crate::models::document_remark;
use crate::models::prelude::Application;
use crate::services::activity::ActivityAction;
use crate::services::documents::DocumentKey;
use crate::services::notify::{self, Notification};
use crate::services::uploads::{save_upload, UploadKind};
use crate::state::AppState;

/// Create notification routes
pub fn notifications_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_notifications))
        .route("/mark-read", post(mark_read))
        .route("/resubmit", post(resubmit_document))
        .layer(DefaultBodyLimit::max(CONFIG.uploads.max_upload_bytes))
        .with_state(state)
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub notification_key: String,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// The caller's derived notification feed, newest first
async fn list_notifications(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<Vec<Notification>>> {
    let items = notify::build_notifications(&state.db, auth.user_id()).await?;
    Ok(Json(items))
}

/// Mark one notification as seen (idempotent)
async fn mark_read(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(request): Json<MarkReadRequest>,
) -> Result<Json<serde_json::Value>> {
    if request.notification_key.is_empty() {
        return Err(AppError::BadRequest(
            "notification_key required".to_string(),
        ));
    }

    notify::mark_read(&state.db, auth.user_id(), &request.notification_key).await?;

    Ok(Json(serde_json::json!({ "message": "Marked read" })))
}

/// Resubmit a single document for one of the caller's applications
async fn resubmit_document(
    State(state): State<AppState>,
    auth: Authenticated,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let mut application_id: Option<i64> = None;
    let mut document_name: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or("") {
            "application_id" => {
                application_id = field.text().await?.trim().parse().ok();
            }
            "document_name" => {
                document_name = Some(field.text().await?);
            }
            "file" => {
                let name = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await?.to_vec();
                file = Some((name, data));
            }
            _ => {}
        }
    }

    let application_id = application_id.ok_or_else(|| {
        AppError::BadRequest("application_id and document_name required".to_string())
    })?;
    let document_name = document_name.ok_or_else(|| {
        AppError::BadRequest("application_id and document_name required".to_string())
    })?;
    let (file_name, data) =
        file.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let document = DocumentKey::parse(&document_name)
        .ok_or_else(|| AppError::BadRequest("Invalid document_name".to_string()))?;

    // Resubmission is scoped to the caller's own applications
    let app = Application::find_by_id(application_id)
        .filter(application::Column::UserId.eq(auth.user_id()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    let stored_path = save_upload(UploadKind::Document, &file_name, &data).await?;

    let mut active: application::ActiveModel = app.into();
    active.set(document.file_column(), stored_path.into());
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    // The resubmission shows up in the document's remark thread
    let remark = document_remark::ActiveModel {
        application_id: Set(application_id),
        document_name: Set(document.as_str().to_string()),
        remark: Set(format!("User resubmitted {}", document.as_str())),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    remark.insert(&state.db).await?;

    state
        .activity
        .record(
            auth.actor(),
            ActivityAction::ResubmitDocument,
            format!(
                "Resubmitted document '{}' for application {}",
                document.as_str(),
                application_id
            ),
        )
        .await;

    Ok(Json(serde_json::json!({ "message": "Resubmitted successfully" })))
}
