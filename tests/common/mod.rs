//! Test helpers and utilities for integration testing.
//!
//! Each test gets its own in-memory SQLite database migrated by the crate's
//! Migrator, and drives the real router through `tower::ServiceExt`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use tower::util::ServiceExt;

use eteeap_backend::endpoints::create_router;
use eteeap_backend::migrations::Migrator;
use eteeap_backend::models::application::{self, ApplicationStatus};
use eteeap_backend::models::document_remark;
use eteeap_backend::models::user::{self, Role};
use eteeap_backend::services::activity::ActivityService;
use eteeap_backend::services::mail::Mailer;
use eteeap_backend::services::security::{create_session_token, hash_password};
use eteeap_backend::state::AppState;

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    // Use simple in-memory SQLite - each connection gets its own database
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Build an AppState around a test database (mail disabled)
pub fn build_app_state(db: DatabaseConnection) -> AppState {
    AppState::new(db.clone(), ActivityService::new(db), Mailer::disabled())
}

/// Create a test user and return the user model
pub async fn create_test_user(
    db: &DatabaseConnection,
    fullname: &str,
    email: &str,
    password: &str,
    role: Role,
) -> user::Model {
    let now = Utc::now();
    let new_user = user::ActiveModel {
        fullname: Set(fullname.to_string()),
        email: Set(email.to_string()),
        password: Set(Some(hash_password(password).unwrap())),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_user.insert(db).await.unwrap()
}

/// Create a submitted (non-draft) pending application for a user
pub async fn create_application(
    db: &DatabaseConnection,
    user_id: i64,
    program: &str,
) -> application::Model {
    let now = Utc::now();
    let app = application::ActiveModel {
        user_id: Set(user_id),
        program_name: Set(program.to_string()),
        full_name: Set("Test Applicant".to_string()),
        email: Set("applicant@example.com".to_string()),
        status: Set(ApplicationStatus::Pending),
        is_draft: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    app.insert(db).await.unwrap()
}

/// Insert a document remark with an explicit timestamp
pub async fn create_remark(
    db: &DatabaseConnection,
    application_id: i64,
    document_name: &str,
    remark: &str,
    created_at: DateTime<Utc>,
) -> document_remark::Model {
    let entry = document_remark::ActiveModel {
        application_id: Set(application_id),
        document_name: Set(document_name.to_string()),
        remark: Set(remark.to_string()),
        created_at: Set(created_at),
        ..Default::default()
    };

    entry.insert(db).await.unwrap()
}

/// Session cookie for a user, bypassing the login endpoint
pub fn auth_cookie(user: &user::Model) -> String {
    format!("eteeap_session={}", create_session_token(user).unwrap())
}

/// Collect a response body as JSON
pub async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::json!({}))
}

/// Send a JSON request through the router
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let response = app
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

/// Send a body-less request through the router
pub async fn send_empty(
    app: Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let response = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, json_body(response).await)
}

/// POST /auth/login with the supplied credentials.
/// Returns (status, response_body_json, optional_session_cookie).
pub async fn do_login(
    state: AppState,
    email: &str,
    password: &str,
) -> (StatusCode, serde_json::Value, Option<String>) {
    let app = create_router(state);
    let payload = serde_json::json!({"email": email, "password": password}).to_string();

    let request = Request::builder()
        .uri("/auth/login")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(payload))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();

    let cookie = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .find_map(|h| {
            let s = h.to_str().ok()?;
            if s.starts_with("eteeap_session=") {
                let token = s.strip_prefix("eteeap_session=")?.splitn(2, ';').next()?;
                if token.is_empty() {
                    None
                } else {
                    Some(format!("eteeap_session={}", token))
                }
            } else {
                None
            }
        });

    let body = json_body(response).await;
    (status, body, cookie)
}
