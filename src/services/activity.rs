//! Activity trail service.
//!
//! Every mutating action is attributed to an explicit [`Actor`] supplied by
//! the caller: either the authenticated user or the `System` actor for
//! actions taken outside a request (bootstrap, maintenance). Recording never
//! fails the surrounding request; failures are traced and dropped.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::activity_log;
use crate::models::user::{self, Role};
use crate::state::DbConn;

/// Identity an activity entry is attributed to.
#[derive(Debug, Clone, Copy)]
pub enum Actor {
    User { id: i64, role: Role },
    System,
}

impl Actor {
    pub fn from_user(user: &user::Model) -> Self {
        Actor::User {
            id: user.id,
            role: user.role,
        }
    }

    fn parts(&self) -> (Option<i64>, &'static str) {
        match self {
            Actor::User { id, role } => (Some(*id), role.as_str()),
            Actor::System => (None, "system"),
        }
    }
}

/// Activity action types
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum ActivityAction {
    Signup,
    Login,
    GoogleLogin,
    GoogleSignup,
    ForgotPasswordEmailSent,
    ResetPassword,
    UpdateProfile,
    UpdateProfilePicture,
    DeleteAccount,
    CreateDraft,
    UpdateDraft,
    SubmitApplication,
    DeleteDraft,
    ResubmitDocument,
    UpdateApplicationStatus,
    UpdateDocumentStatus,
    VerifyFile,
    UnverifyFile,
    AddDocumentRemark,
    DeleteApplication,
    CreateAdmin,
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityAction::Signup => write!(f, "signup"),
            ActivityAction::Login => write!(f, "login"),
            ActivityAction::GoogleLogin => write!(f, "google_login"),
            ActivityAction::GoogleSignup => write!(f, "google_signup"),
            ActivityAction::ForgotPasswordEmailSent => write!(f, "forgot_password_email_sent"),
            ActivityAction::ResetPassword => write!(f, "reset_password"),
            ActivityAction::UpdateProfile => write!(f, "update_profile"),
            ActivityAction::UpdateProfilePicture => write!(f, "update_profile_picture"),
            ActivityAction::DeleteAccount => write!(f, "delete_account"),
            ActivityAction::CreateDraft => write!(f, "create_draft"),
            ActivityAction::UpdateDraft => write!(f, "update_draft"),
            ActivityAction::SubmitApplication => write!(f, "submit_application"),
            ActivityAction::DeleteDraft => write!(f, "delete_draft"),
            ActivityAction::ResubmitDocument => write!(f, "resubmit_document"),
            ActivityAction::UpdateApplicationStatus => write!(f, "update_application_status"),
            ActivityAction::UpdateDocumentStatus => write!(f, "update_document_status"),
            ActivityAction::VerifyFile => write!(f, "verify_file"),
            ActivityAction::UnverifyFile => write!(f, "unverify_file"),
            ActivityAction::AddDocumentRemark => write!(f, "add_document_remark"),
            ActivityAction::DeleteApplication => write!(f, "delete_application"),
            ActivityAction::CreateAdmin => write!(f, "create_admin"),
        }
    }
}

/// Activity logging service
#[derive(Clone)]
pub struct ActivityService {
    db: DbConn,
}

impl ActivityService {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Record an activity entry. Failures are traced, never propagated.
    pub async fn record(&self, actor: Actor, action: ActivityAction, details: impl Into<String>) {
        let (user_id, role) = actor.parts();

        let entry = activity_log::ActiveModel {
            user_id: Set(user_id),
            role: Set(role.to_string()),
            action: Set(action.to_string()),
            details: Set(Some(details.into())),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        if let Err(e) = entry.insert(&self.db).await {
            tracing::error!("Failed to record activity entry: {}", e);
        }
    }
}

/// Query parameters for fetching activity logs
#[derive(Debug, Clone, Deserialize)]
pub struct ActivityQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub user_id: Option<i64>,
    pub role: Option<String>,
    pub action: Option<String>,
}

/// Paginated activity log response
#[derive(Debug, Clone, Serialize)]
pub struct ActivityPage {
    pub logs: Vec<activity_log::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

/// Get activity logs with filtering and pagination, newest first
pub async fn list_activity(db: &DbConn, query: ActivityQuery) -> Result<ActivityPage> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(50).min(100);
    let offset = (page - 1) * per_page;

    let mut select = activity_log::Entity::find();

    if let Some(user_id) = query.user_id {
        select = select.filter(activity_log::Column::UserId.eq(user_id));
    }

    if let Some(role) = &query.role {
        select = select.filter(activity_log::Column::Role.eq(role.clone()));
    }

    if let Some(action) = &query.action {
        select = select.filter(activity_log::Column::Action.eq(action.clone()));
    }

    let total = select.clone().count(db).await?;

    let logs = select
        .order_by_desc(activity_log::Column::CreatedAt)
        .order_by_desc(activity_log::Column::Id)
        .offset(offset)
        .limit(per_page)
        .all(db)
        .await?;

    let total_pages = (total as f64 / per_page as f64).ceil() as u64;

    Ok(ActivityPage {
        logs,
        total,
        page,
        per_page,
        total_pages,
    })
}
