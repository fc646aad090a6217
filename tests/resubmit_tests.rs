//! Document resubmission integration tests
//!
//! Covers POST /notifications/resubmit (multipart):
//! - Stores the file, updates the document's path column, appends a remark
//! - Owner scoping and document-name whitelisting

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use once_cell::sync::Lazy;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tower::util::ServiceExt;

mod common;
use common::{auth_cookie, build_app_state, create_application, create_test_db, create_test_user};

use eteeap_backend::endpoints::create_router;
use eteeap_backend::models::document_remark;
use eteeap_backend::models::prelude::{Application, DocumentRemark};
use eteeap_backend::models::user::Role;

/// Uploads land in a per-run temp directory. CONFIG is frozen on first
/// access, so the variable is set once for the whole test binary.
static UPLOADS_DIR: Lazy<std::path::PathBuf> = Lazy::new(|| {
    let dir = std::env::temp_dir().join(format!("eteeap-test-uploads-{}", std::process::id()));
    std::env::set_var("ETEEAP_UPLOADS_DIR", &dir);
    dir
});

const BOUNDARY: &str = "X-ETEEAP-TEST-BOUNDARY";

fn multipart_body(application_id: Option<i64>, document_name: Option<&str>, file: bool) -> String {
    let mut body = String::new();
    if let Some(id) = application_id {
        body.push_str(&format!(
            "--{}\r\ncontent-disposition: form-data; name=\"application_id\"\r\n\r\n{}\r\n",
            BOUNDARY, id
        ));
    }
    if let Some(name) = document_name {
        body.push_str(&format!(
            "--{}\r\ncontent-disposition: form-data; name=\"document_name\"\r\n\r\n{}\r\n",
            BOUNDARY, name
        ));
    }
    if file {
        body.push_str(&format!(
            "--{}\r\ncontent-disposition: form-data; name=\"file\"; filename=\"resume.pdf\"\r\n\
             content-type: application/pdf\r\n\r\n%PDF-1.4 fake content\r\n",
            BOUNDARY
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

async fn post_resubmit(
    app: axum::Router,
    cookie: &str,
    body: String,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .uri("/notifications/resubmit")
        .method("POST")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::json!({}));
    (status, body)
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_resubmit_stores_file_and_appends_remark() {
    Lazy::force(&UPLOADS_DIR);
    let db = create_test_db().await;
    let me = create_test_user(&db, "Resubmitter", "re@example.com", "pw12345678", Role::User).await;
    let app = create_application(&db, me.id, "BS Information Technology").await;

    let state = build_app_state(db.clone());
    let cookie = auth_cookie(&me);
    let (status, body) = post_resubmit(
        create_router(state),
        &cookie,
        multipart_body(Some(app.id), Some("resume"), true),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "Body: {}", body);

    let stored = Application::find_by_id(app.id).one(&db).await.unwrap().unwrap();
    let path = stored.resume.expect("The resume path column must be set");
    assert!(
        path.starts_with("uploads/documents/"),
        "Stored path must live under the documents dir: {}",
        path
    );
    assert!(path.ends_with(".pdf"), "Original extension kept: {}", path);

    let remarks = DocumentRemark::find()
        .filter(document_remark::Column::ApplicationId.eq(app.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(remarks.len(), 1, "Resubmission appends a remark");
    assert_eq!(remarks[0].document_name, "resume");
    assert!(remarks[0].remark.contains("resubmitted"));
}

// ============================================================================
// Validation and scoping
// ============================================================================

#[tokio::test]
async fn test_resubmit_foreign_application_returns_404() {
    Lazy::force(&UPLOADS_DIR);
    let db = create_test_db().await;
    let me = create_test_user(&db, "Me", "me@example.com", "pw12345678", Role::User).await;
    let other = create_test_user(&db, "Other", "other@example.com", "pw12345678", Role::User).await;
    let foreign = create_application(&db, other.id, "BS Accountancy").await;

    let state = build_app_state(db);
    let cookie = auth_cookie(&me);
    let (status, _) = post_resubmit(
        create_router(state),
        &cookie,
        multipart_body(Some(foreign.id), Some("resume"), true),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resubmit_unknown_document_returns_400() {
    Lazy::force(&UPLOADS_DIR);
    let db = create_test_db().await;
    let me = create_test_user(&db, "Me", "me@example.com", "pw12345678", Role::User).await;
    let app = create_application(&db, me.id, "BS Information Technology").await;

    let state = build_app_state(db);
    let cookie = auth_cookie(&me);
    let (status, _) = post_resubmit(
        create_router(state),
        &cookie,
        multipart_body(Some(app.id), Some("not_a_document"), true),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resubmit_without_file_returns_400() {
    Lazy::force(&UPLOADS_DIR);
    let db = create_test_db().await;
    let me = create_test_user(&db, "Me", "me@example.com", "pw12345678", Role::User).await;
    let app = create_application(&db, me.id, "BS Information Technology").await;

    let state = build_app_state(db);
    let cookie = auth_cookie(&me);
    let (status, _) = post_resubmit(
        create_router(state),
        &cookie,
        multipart_body(Some(app.id), Some("resume"), false),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resubmit_missing_fields_returns_400() {
    Lazy::force(&UPLOADS_DIR);
    let db = create_test_db().await;
    let me = create_test_user(&db, "Me", "me@example.com", "pw12345678", Role::User).await;

    let state = build_app_state(db);
    let cookie = auth_cookie(&me);
    let (status, _) = post_resubmit(
        create_router(state),
        &cookie,
        multipart_body(None, None, true),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
