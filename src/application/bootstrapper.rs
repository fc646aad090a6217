//! Application bootstrapper
//!
//! Handles all initialization and setup for the admissions backend.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::Router;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::CONFIG;
use crate::db;
use crate::endpoints;
use crate::error::Result;
use crate::models::user::{self, Role};
use crate::services::activity::{ActivityService, Actor, ActivityAction};
use crate::services::mail::Mailer;
use crate::services::security::hash_password;
use crate::state::AppState;

/// Bootstrap and run the application
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting ETEEAP admissions backend v{}", env!("CARGO_PKG_VERSION"));

    let state = init_services().await?;

    let app = create_app(state);

    serve(app).await
}

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("eteeap_backend={}", CONFIG.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .init();
}

/// Initialize all application services
async fn init_services() -> anyhow::Result<AppState> {
    let conn = db::connect().await?;
    tracing::info!("Database connection established");

    init_upload_dirs()?;

    let activity = ActivityService::new(conn.clone());
    let mailer = Mailer::from_config(&CONFIG.mail);

    ensure_builtin_admin(&conn, &activity).await?;

    Ok(AppState::new(conn, activity, mailer))
}

/// Create the upload directories if they do not exist yet
fn init_upload_dirs() -> std::io::Result<()> {
    std::fs::create_dir_all(CONFIG.uploads.profile_dir())?;
    std::fs::create_dir_all(CONFIG.uploads.documents_dir())?;
    Ok(())
}

/// Create the built-in administrator account when it does not exist
async fn ensure_builtin_admin(db: &db::DbConn, activity: &ActivityService) -> Result<()> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&CONFIG.auth.admin_email))
        .one(db)
        .await?;

    if existing.is_some() {
        tracing::debug!("Built-in admin account already exists");
        return Ok(());
    }

    let now = chrono::Utc::now();
    let admin = user::ActiveModel {
        fullname: Set(CONFIG.auth.admin_fullname.clone()),
        email: Set(CONFIG.auth.admin_email.clone()),
        password: Set(Some(hash_password(&CONFIG.auth.admin_password)?)),
        role: Set(Role::Admin),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let admin = admin.insert(db).await?;

    tracing::info!("Built-in admin account created: {}", admin.email);
    activity
        .record(
            Actor::System,
            ActivityAction::CreateAdmin,
            format!("Admin account created: {}", admin.email),
        )
        .await;

    Ok(())
}

/// Create the main application router
fn create_app(state: AppState) -> Router {
    endpoints::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// CORS is wide open unless explicit origins are configured
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = CONFIG
        .server
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the HTTP server
async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", CONFIG.server.host, CONFIG.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
