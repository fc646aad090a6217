//! Profile endpoint integration tests
//!
//! Covers the applicant self-service surface:
//! - GET    /profile                   — identity and picture URL
//! - GET    /profile/applications      — owner-scoped listing
//! - GET    /profile/applications/:id  — detail with remarks and verified flags
//! - DELETE /profile/delete            — account removal with cascade

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

mod common;
use common::{
    auth_cookie, build_app_state, create_application, create_remark, create_test_db,
    create_test_user, send_empty,
};

use eteeap_backend::endpoints::create_router;
use eteeap_backend::models::prelude::{Application, User};
use eteeap_backend::models::user::Role;
use eteeap_backend::models::verified_file;

// ============================================================================
// GET /profile
// ============================================================================

#[tokio::test]
async fn test_get_profile_returns_identity() {
    let db = create_test_db().await;
    let me = create_test_user(&db, "Profile User", "me@example.com", "pw12345678", Role::User).await;

    let state = build_app_state(db);
    let cookie = auth_cookie(&me);
    let (status, body) = send_empty(create_router(state), "GET", "/profile", Some(&cookie)).await;

    assert_eq!(status, StatusCode::OK, "Body: {}", body);
    assert_eq!(body["id"], me.id);
    assert_eq!(body["fullname"], "Profile User");
    assert_eq!(body["email"], "me@example.com");
    assert!(
        body["profile_picture"]
            .as_str()
            .unwrap()
            .ends_with("uploads/profile/default.png"),
        "Missing picture falls back to the default image"
    );
}

#[tokio::test]
async fn test_get_profile_requires_session() {
    let db = create_test_db().await;
    let state = build_app_state(db);

    let (status, _) = send_empty(create_router(state), "GET", "/profile", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_accepts_bearer_token() {
    let db = create_test_db().await;
    let me = create_test_user(&db, "Bearer User", "bearer@example.com", "pw12345678", Role::User)
        .await;
    let state = build_app_state(db);
    let app = create_router(state);

    let token =
        eteeap_backend::services::security::create_session_token(&me).unwrap();
    let request = axum::http::Request::builder()
        .uri("/profile")
        .method("GET")
        .header(axum::http::header::AUTHORIZATION, format!("Bearer {}", token))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(
        response.status(),
        StatusCode::OK,
        "The session token is also accepted as a Bearer header"
    );
}

// ============================================================================
// GET /profile/applications
// ============================================================================

#[tokio::test]
async fn test_my_applications_are_owner_scoped() {
    let db = create_test_db().await;
    let me = create_test_user(&db, "Mine", "mine@example.com", "pw12345678", Role::User).await;
    let other = create_test_user(&db, "Other", "other@example.com", "pw12345678", Role::User).await;
    create_application(&db, me.id, "BS Information Technology").await;
    create_application(&db, other.id, "BS Accountancy").await;

    let state = build_app_state(db);
    let cookie = auth_cookie(&me);
    let (status, body) = send_empty(
        create_router(state),
        "GET",
        "/profile/applications",
        Some(&cookie),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1, "Only the caller's applications are listed");
    assert_eq!(rows[0]["program_name"], "BS Information Technology");
}

// ============================================================================
// GET /profile/applications/:id
// ============================================================================

#[tokio::test]
async fn test_application_detail_merges_remarks_and_flags() {
    let db = create_test_db().await;
    let me = create_test_user(&db, "Detail", "detail@example.com", "pw12345678", Role::User).await;
    let app = create_application(&db, me.id, "BS Information Technology").await;

    let base = Utc::now() - Duration::hours(3);
    create_remark(&db, app.id, "resume", "first pass", base).await;
    create_remark(&db, app.id, "resume", "second pass", base + Duration::hours(1)).await;
    create_remark(&db, app.id, "picture", "too blurry", base).await;

    let marker = verified_file::ActiveModel {
        application_id: Set(app.id),
        file_key: Set("resume".to_string()),
        verified_by: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    marker.insert(&db).await.unwrap();

    let state = build_app_state(db);
    let cookie = auth_cookie(&me);
    let (status, body) = send_empty(
        create_router(state),
        "GET",
        &format!("/profile/applications/{}", app.id),
        Some(&cookie),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "Body: {}", body);
    assert_eq!(body["application"]["id"], app.id);
    assert_eq!(
        body["remarks"]["resume"]["remark"], "second pass",
        "Only the most recent remark per document is returned"
    );
    assert_eq!(body["remarks"]["picture"]["remark"], "too blurry");
    assert_eq!(body["verified"]["resume_verified"], 1);
    assert_eq!(body["verified"]["picture_verified"], 0);
}

#[tokio::test]
async fn test_application_detail_foreign_row_returns_404() {
    let db = create_test_db().await;
    let me = create_test_user(&db, "Me", "me@example.com", "pw12345678", Role::User).await;
    let other = create_test_user(&db, "Other", "other@example.com", "pw12345678", Role::User).await;
    let foreign = create_application(&db, other.id, "BS Accountancy").await;

    let state = build_app_state(db);
    let cookie = auth_cookie(&me);
    let (status, _) = send_empty(
        create_router(state),
        "GET",
        &format!("/profile/applications/{}", foreign.id),
        Some(&cookie),
    )
    .await;

    assert_eq!(
        status,
        StatusCode::NOT_FOUND,
        "Another user's application must look like it does not exist"
    );
}

// ============================================================================
// DELETE /profile/delete
// ============================================================================

#[tokio::test]
async fn test_delete_account_cascades_applications() {
    let db = create_test_db().await;
    let me = create_test_user(&db, "Doomed", "doomed@example.com", "pw12345678", Role::User).await;
    let app = create_application(&db, me.id, "BS Information Technology").await;

    let state = build_app_state(db.clone());
    let cookie = auth_cookie(&me);
    let (status, _) = send_empty(
        create_router(state),
        "DELETE",
        "/profile/delete",
        Some(&cookie),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(User::find_by_id(me.id).one(&db).await.unwrap().is_none());
    assert!(
        Application::find_by_id(app.id).one(&db).await.unwrap().is_none(),
        "Applications must cascade with the account"
    );
}
