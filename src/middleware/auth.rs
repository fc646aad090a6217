//! Session middleware for protected routes.
//!
//! A single authenticated-identity channel: the session token is read from
//! the session cookie or an Authorization Bearer header, validated, and
//! resolved to the user row. Handlers receive the identity through the
//! extractors in [`crate::middleware::identity`]. There is no side-channel
//! header carrying a raw user id.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::EntityTrait;

use crate::models::prelude::User;
use crate::models::user;
use crate::services::security::decode_session_token;
use crate::state::AppState;

pub const SESSION_COOKIE_NAME: &str = "eteeap_session";

/// Authenticated user stored in request extensions
#[derive(Clone)]
pub struct CurrentUser(pub user::Model);

/// Middleware that resolves the session token to a user.
///
/// Returns 401 Unauthorized when the token is missing, invalid, expired,
/// or no longer maps to a user row.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = match extract_session_token(req.headers()) {
        Some(t) => t,
        None => return unauthorized_response("Unauthorized"),
    };

    let user = match resolve_user(&state, &token).await {
        Ok(u) => u,
        Err(msg) => return unauthorized_response(&msg),
    };

    req.extensions_mut().insert(CurrentUser(user));

    next.run(req).await
}

/// Extract the session token from the cookie or an Authorization header
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for cookie in cookies.split(';') {
            let cookie = cookie.trim();
            if let Some(value) = cookie.strip_prefix(&format!("{}=", SESSION_COOKIE_NAME)) {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

/// Validate the token and fetch the user row
async fn resolve_user(state: &AppState, token: &str) -> Result<user::Model, String> {
    let claims =
        decode_session_token(token).map_err(|_| "Invalid or expired session".to_string())?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| "Invalid session subject".to_string())?;

    let found = User::find_by_id(user_id)
        .one(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("Session lookup failed: {}", e);
            "Session lookup failed".to_string()
        })?;

    found.ok_or_else(|| "User not found".to_string())
}

/// Create a 401 Unauthorized JSON response
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "detail": message
        })),
    )
        .into_response()
}
