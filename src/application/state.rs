use sea_orm::DatabaseConnection;

use crate::services::activity::ActivityService;
use crate::services::mail::Mailer;

/// Database connection type alias
pub type DbConn = DatabaseConnection;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub activity: ActivityService,
    pub mailer: Mailer,
}

impl AppState {
    pub fn new(db: DbConn, activity: ActivityService, mailer: Mailer) -> Self {
        Self {
            db,
            activity,
            mailer,
        }
    }
}
