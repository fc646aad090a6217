//! Auth flow integration tests
//!
//! Covers the credential lifecycle:
//! - POST /auth/signup      — account creation, validation, duplicate email
//! - POST /auth/login       — valid credentials, invalid credentials, federated accounts
//! - POST /auth/logout      — clears the session cookie
//! - POST /auth/check-email — existence probe without secrets

use axum::http::StatusCode;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};

mod common;
use common::{build_app_state, create_test_db, create_test_user, do_login, send_json};

use eteeap_backend::endpoints::create_router;
use eteeap_backend::models::user::{self, Role};

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_creates_account() {
    let db = create_test_db().await;
    let state = build_app_state(db);

    let (status, body) = send_json(
        create_router(state.clone()),
        "POST",
        "/auth/signup",
        None,
        serde_json::json!({
            "fullname": "Ann Cruz",
            "email": "ann@example.com",
            "password": "Secret123"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "Signup must succeed. Body: {}", body);
    assert_eq!(body["success"], true);

    // The created account can log in with the same credentials
    let (status, body, cookie) = do_login(state, "ann@example.com", "Secret123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "user", "Signup must create a plain user");
    assert!(cookie.is_some());
}

#[tokio::test]
async fn test_signup_duplicate_email_returns_409() {
    let db = create_test_db().await;
    create_test_user(&db, "First User", "dup@example.com", "pw12345678", Role::User).await;
    let state = build_app_state(db);

    let (status, _) = send_json(
        create_router(state),
        "POST",
        "/auth/signup",
        None,
        serde_json::json!({
            "fullname": "Second User",
            "email": "dup@example.com",
            "password": "pw12345678"
        }),
    )
    .await;

    assert_eq!(
        status,
        StatusCode::CONFLICT,
        "Duplicate email must be rejected"
    );
}

#[tokio::test]
async fn test_signup_invalid_email_returns_400() {
    let db = create_test_db().await;
    let state = build_app_state(db);

    let (status, _) = send_json(
        create_router(state),
        "POST",
        "/auth/signup",
        None,
        serde_json::json!({
            "fullname": "Bad Email",
            "email": "not-an-email",
            "password": "pw12345678"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_short_password_returns_400() {
    let db = create_test_db().await;
    let state = build_app_state(db);

    let (status, _) = send_json(
        create_router(state),
        "POST",
        "/auth/signup",
        None,
        serde_json::json!({
            "fullname": "Short Pw",
            "email": "short@example.com",
            "password": "short"
        }),
    )
    .await;

    assert_eq!(
        status,
        StatusCode::BAD_REQUEST,
        "Passwords under 8 characters must be rejected"
    );
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_valid_credentials_returns_200_and_cookie() {
    let db = create_test_db().await;
    create_test_user(&db, "Login User", "login@example.com", "correct_pw", Role::User).await;

    let state = build_app_state(db);
    let (status, body, cookie) = do_login(state, "login@example.com", "correct_pw").await;

    assert_eq!(
        status,
        StatusCode::OK,
        "Valid login must return 200. Body: {}",
        body
    );
    let cookie = cookie.expect("Login must set a session cookie");
    assert!(cookie.starts_with("eteeap_session="));
    assert!(!cookie.trim_start_matches("eteeap_session=").is_empty());
}

#[tokio::test]
async fn test_login_returns_user_info_without_secrets() {
    let db = create_test_db().await;
    let created =
        create_test_user(&db, "Info User", "info@example.com", "pw12345678", Role::User).await;

    let state = build_app_state(db);
    let (status, body, _) = do_login(state, "info@example.com", "pw12345678").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], created.id);
    assert_eq!(body["user"]["email"], "info@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(
        body["user"].get("password").is_none(),
        "Password hash must never be serialized"
    );
}

#[tokio::test]
async fn test_login_wrong_password_returns_401() {
    let db = create_test_db().await;
    create_test_user(&db, "Wrong Pw", "wp@example.com", "correct_pw", Role::User).await;

    let state = build_app_state(db);
    let (status, body, cookie) = do_login(state, "wp@example.com", "incorrect").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none(), "No session on failed login");
    assert!(
        !body.to_string().contains("correct_pw"),
        "Failure response must not leak password data"
    );
}

#[tokio::test]
async fn test_login_unknown_email_returns_401() {
    let db = create_test_db().await;
    let state = build_app_state(db);

    let (status, _, _) = do_login(state, "nobody@example.com", "anything").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_federated_account_without_password_returns_401() {
    let db = create_test_db().await;

    // Accounts created through Google signup carry no password hash
    let now = Utc::now();
    let federated = user::ActiveModel {
        fullname: Set("Google Only".to_string()),
        email: Set("google@example.com".to_string()),
        password: Set(None),
        role: Set(Role::User),
        google_id: Set(Some("google-sub-1".to_string())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    federated.insert(&db).await.unwrap();

    let state = build_app_state(db);
    let (status, _, _) = do_login(state, "google@example.com", "whatever").await;

    assert_eq!(
        status,
        StatusCode::UNAUTHORIZED,
        "Password login must fail for federated-only accounts"
    );
}

#[tokio::test]
async fn test_login_missing_fields_returns_400() {
    let db = create_test_db().await;
    let state = build_app_state(db);

    let (status, _) = send_json(
        create_router(state),
        "POST",
        "/auth/login",
        None,
        serde_json::json!({"email": "", "password": ""}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_clears_session_cookie() {
    let db = create_test_db().await;
    let state = build_app_state(db);
    let app = create_router(state);

    let request = axum::http::Request::builder()
        .uri("/auth/logout")
        .method("POST")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .expect("Logout must set an expiring cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("eteeap_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}

// ============================================================================
// Check email
// ============================================================================

#[tokio::test]
async fn test_check_email_known_address() {
    let db = create_test_db().await;
    create_test_user(&db, "Known", "known@example.com", "pw12345678", Role::User).await;
    let state = build_app_state(db);

    let (status, body) = send_json(
        create_router(state),
        "POST",
        "/auth/check-email",
        None,
        serde_json::json!({"email": "known@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], true);
    assert!(
        body["user"].get("password").is_none(),
        "check-email must not expose the password hash"
    );
}

#[tokio::test]
async fn test_check_email_unknown_address() {
    let db = create_test_db().await;
    let state = build_app_state(db);

    let (status, body) = send_json(
        create_router(state),
        "POST",
        "/auth/check-email",
        None,
        serde_json::json!({"email": "unknown@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], false);
}
