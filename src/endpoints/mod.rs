pub mod admin;
pub mod auth;
pub mod notifications;
pub mod profile;

use axum::{middleware as axum_middleware, Router};
use tower_http::services::ServeDir;

use crate::config::CONFIG;
use crate::middleware::{require_session, security_headers};
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/version", axum::routing::get(get_version))
        .nest("/auth", auth::auth_routes(state.clone()))
        .nest_service("/uploads", ServeDir::new(&CONFIG.uploads.base_dir));

    // Protected routes (session required)
    let protected_routes = Router::new()
        .nest("/admin", admin::admin_routes(state.clone()))
        .nest("/profile", profile::profile_routes(state.clone()))
        .nest(
            "/notifications",
            notifications::notifications_routes(state.clone()),
        )
        .layer(axum_middleware::from_fn_with_state(state, require_session));

    public_routes
        .merge(protected_routes)
        .layer(axum_middleware::from_fn(security_headers))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Version info endpoint
async fn get_version() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "version": CONFIG.version,
        "backend": "rust"
    }))
}
