use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::CONFIG;
use crate::error::{AppError, Result};
use crate::middleware::auth::SESSION_COOKIE_NAME;
use crate::models::prelude::*;
use crate::models::user::{self, Role};
use crate::models::password_reset;
use crate::services::activity::{ActivityAction, Actor};
use crate::services::security::{
    create_session_token, generate_reset_token, hash_password, verify_password,
};
use crate::state::AppState;

/// Create auth routes for signup, login and password recovery
pub fn auth_routes(state: AppState) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/check-email", post(check_email))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/google", get(google_login))
        .route("/google/signup", get(google_signup))
        .route("/google/callback", get(google_callback))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Fullname is required"))]
    pub fullname: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub user: user::Model,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

// ============================================================================
// Session Cookie Helpers
// ============================================================================

/// Create a session cookie with the given token
fn create_session_cookie(token: &str, secure: bool) -> HeaderValue {
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        SESSION_COOKIE_NAME,
        token,
        CONFIG.auth.session_ttl_secs,
        if secure { "; Secure" } else { "" }
    );
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Create a cookie that clears the session
fn clear_session_cookie() -> HeaderValue {
    let cookie = format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE_NAME
    );
    HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
}

fn cookie_secure() -> bool {
    CONFIG.auth.public_base_url.starts_with("https://")
}

// ============================================================================
// Credential Endpoints
// ============================================================================

/// Register a new applicant account
async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<serde_json::Value>> {
    request
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let existing = User::find()
        .filter(user::Column::Email.eq(&request.email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let now = Utc::now();
    let new_user = user::ActiveModel {
        fullname: Set(request.fullname.trim().to_string()),
        email: Set(request.email.trim().to_string()),
        password: Set(Some(hash_password(&request.password)?)),
        role: Set(Role::User),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_user.insert(&state.db).await?;

    state
        .activity
        .record(
            Actor::from_user(&created),
            ActivityAction::Signup,
            format!("User signed up: {}", created.email),
        )
        .await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Signup successful!"
    })))
}

/// Login with email and password, returns session cookie
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response> {
    if request.email.is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let found_user = User::find()
        .filter(user::Column::Email.eq(&request.email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    // Federated-only accounts carry no password hash
    let hash = found_user
        .password
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !verify_password(&request.password, hash) {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = create_session_token(&found_user)?;

    state
        .activity
        .record(
            Actor::from_user(&found_user),
            ActivityAction::Login,
            "User logged in",
        )
        .await;

    let response = Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        user: found_user,
    });

    Ok((
        [(
            header::SET_COOKIE,
            create_session_cookie(&token, cookie_secure()),
        )],
        response,
    )
        .into_response())
}

/// Logout - clears the session cookie
async fn logout() -> Response {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(serde_json::json!({"message": "Logged out"})),
    )
        .into_response()
}

/// Check whether an email is already registered
async fn check_email(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<serde_json::Value>> {
    if request.email.is_empty() {
        return Err(AppError::BadRequest("Email required".to_string()));
    }

    let found = User::find()
        .filter(user::Column::Email.eq(&request.email))
        .one(&state.db)
        .await?;

    match found {
        // Secret-bearing fields are skipped by the model's serializer
        Some(found_user) => Ok(Json(serde_json::json!({
            "exists": true,
            "user": found_user,
        }))),
        None => Ok(Json(serde_json::json!({ "exists": false }))),
    }
}

// ============================================================================
// Password Reset
// ============================================================================

/// Request a password-reset email
async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<serde_json::Value>> {
    if request.email.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    // Known enumeration tradeoff: unknown emails are reported as 404
    let found_user = User::find()
        .filter(user::Column::Email.eq(&request.email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Email not found".to_string()))?;

    let token = generate_reset_token();
    let expires_at = Utc::now() + Duration::seconds(CONFIG.auth.reset_token_ttl_secs);

    let reset = password_reset::ActiveModel {
        user_id: Set(found_user.id),
        token: Set(token.clone()),
        expires_at: Set(expires_at),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    reset.insert(&state.db).await?;

    let reset_url = format!("{}/reset-password?token={}", CONFIG.frontend_url, token);
    state
        .mailer
        .send_password_reset(&found_user.email, &found_user.fullname, &reset_url)
        .await?;

    state
        .activity
        .record(
            Actor::from_user(&found_user),
            ActivityAction::ForgotPasswordEmailSent,
            "Sent password reset email",
        )
        .await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Reset link sent to your email."
    })))
}

/// Consume a password-reset token
async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    if request.token.is_empty() || request.new_password.is_empty() {
        return Err(AppError::BadRequest(
            "Token and new password required".to_string(),
        ));
    }

    let reset = PasswordReset::find()
        .filter(password_reset::Column::Token.eq(&request.token))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired token".to_string()))?;

    if reset.expires_at < Utc::now() {
        return Err(AppError::BadRequest("Token has expired".to_string()));
    }

    let found_user = User::find_by_id(reset.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired token".to_string()))?;

    let user_id = found_user.id;
    let user_role = found_user.role;

    let mut active: user::ActiveModel = found_user.into();
    active.password = Set(Some(hash_password(&request.new_password)?));
    active.updated_at = Set(Utc::now());
    active.update(&state.db).await?;

    // Token is single-use
    reset.delete(&state.db).await?;

    state
        .activity
        .record(
            Actor::User {
                id: user_id,
                role: user_role,
            },
            ActivityAction::ResetPassword,
            "User reset password via token",
        )
        .await;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Password successfully updated!"
    })))
}

// ============================================================================
// Google OAuth
// ============================================================================

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

fn google_client() -> Result<(String, String)> {
    match (
        CONFIG.auth.google_client_id.clone(),
        CONFIG.auth.google_client_secret.clone(),
    ) {
        (Some(id), Some(secret)) => Ok((id, secret)),
        _ => Err(AppError::BadRequest(
            "Google login is not configured".to_string(),
        )),
    }
}

fn google_redirect_uri() -> String {
    format!("{}/auth/google/callback", CONFIG.auth.public_base_url)
}

fn google_authorize_redirect(state_token: &str) -> Result<Response> {
    let (client_id, _) = google_client()?;

    let url = format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&prompt=select_account&state={}",
        GOOGLE_AUTH_URL,
        urlencoding::encode(&client_id),
        urlencoding::encode(&google_redirect_uri()),
        urlencoding::encode("openid email profile"),
        urlencoding::encode(state_token),
    );

    Ok(Redirect::to(&url).into_response())
}

/// Start the Google login flow
async fn google_login() -> Result<Response> {
    let state_token = format!("login:{}", generate_reset_token());
    google_authorize_redirect(&state_token)
}

/// Start the Google signup flow
async fn google_signup() -> Result<Response> {
    let state_token = format!("signup:{}", generate_reset_token());
    google_authorize_redirect(&state_token)
}

/// Google OAuth callback: exchange the code, then login or create the account
async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Response> {
    if let Some(error) = query.error {
        let msg = query.error_description.unwrap_or(error);
        return Ok(Redirect::to(&format!(
            "{}/login?error={}",
            CONFIG.frontend_url,
            urlencoding::encode(&msg)
        ))
        .into_response());
    }

    let code = query
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;
    let state_token = query
        .state
        .ok_or_else(|| AppError::BadRequest("Missing state parameter".to_string()))?;
    let is_signup = state_token.starts_with("signup:");

    let (client_id, client_secret) = google_client()?;
    let http_client = reqwest::Client::new();

    // Exchange code for an access token
    let token_response = http_client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", google_redirect_uri().as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    if !token_response.status().is_success() {
        let error_text = token_response.text().await.unwrap_or_default();
        tracing::error!("Google token exchange failed: {}", error_text);
        return Ok(Redirect::to(&format!(
            "{}/login?error={}",
            CONFIG.frontend_url,
            urlencoding::encode("Google Authentication Failed")
        ))
        .into_response());
    }

    let token_data: serde_json::Value = token_response.json().await?;
    let access_token = token_data["access_token"]
        .as_str()
        .ok_or_else(|| AppError::Internal("No access token in response".to_string()))?;

    // Fetch the Google profile
    let userinfo: serde_json::Value = http_client
        .get(GOOGLE_USERINFO_URL)
        .header("Authorization", format!("Bearer {}", access_token))
        .send()
        .await?
        .json()
        .await?;

    let email = userinfo["email"]
        .as_str()
        .ok_or_else(|| AppError::Unauthorized("No email returned by Google".to_string()))?
        .to_string();
    let fullname = userinfo["name"].as_str().unwrap_or(&email).to_string();
    let google_id = userinfo["sub"].as_str().map(|s| s.to_string());

    let existing = User::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?;

    if let Some(found_user) = existing {
        // Known account: establish a session regardless of intent
        let token = create_session_token(&found_user)?;

        state
            .activity
            .record(
                Actor::from_user(&found_user),
                ActivityAction::GoogleLogin,
                "Logged in with Google",
            )
            .await;

        return Ok((
            [(
                header::SET_COOKIE,
                create_session_cookie(&token, cookie_secure()),
            )],
            Redirect::to(&CONFIG.frontend_url),
        )
            .into_response());
    }

    if !is_signup {
        return Err(AppError::Forbidden("Email not registered".to_string()));
    }

    // Signup flow: create a password-less account linked to the Google subject
    let now = Utc::now();
    let new_user = user::ActiveModel {
        fullname: Set(fullname),
        email: Set(email.clone()),
        password: Set(None),
        role: Set(Role::User),
        google_id: Set(google_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_user.insert(&state.db).await?;

    state
        .activity
        .record(
            Actor::from_user(&created),
            ActivityAction::GoogleSignup,
            format!("User signed up with Google: {}", email),
        )
        .await;

    Ok(Redirect::to(&format!("{}/login?signup=success", CONFIG.frontend_url)).into_response())
}
