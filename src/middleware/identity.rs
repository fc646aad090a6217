//! Identity extractors for handlers.
//!
//! Usage in handlers:
//! ```ignore
//! use crate::middleware::{Authenticated, RequireAdmin};
//!
//! async fn list_applications(
//!     admin: RequireAdmin,
//!     State(state): State<AppState>,
//! ) -> Result<Json<Vec<ApplicationRow>>> {
//!     // Capability already verified - just use admin.user()
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::models::user::{self, Role};
use crate::services::activity::Actor;

/// Extractor for any authenticated user.
#[derive(Debug, Clone)]
pub struct Authenticated(pub user::Model);

impl Authenticated {
    pub fn user(&self) -> &user::Model {
        &self.0
    }

    pub fn user_id(&self) -> i64 {
        self.0.id
    }

    pub fn actor(&self) -> Actor {
        Actor::from_user(&self.0)
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current = parts
            .extensions
            .get::<CurrentUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        Ok(Authenticated(current.0.clone()))
    }
}

/// Extractor that requires the admin capability.
///
/// Returns 403 Forbidden for authenticated non-admin callers.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub user::Model);

impl RequireAdmin {
    pub fn user(&self) -> &user::Model {
        &self.0
    }

    pub fn user_id(&self) -> i64 {
        self.0.id
    }

    pub fn actor(&self) -> Actor {
        Actor::from_user(&self.0)
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current = parts
            .extensions
            .get::<CurrentUser>()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        if current.0.role != Role::Admin {
            return Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ));
        }

        Ok(RequireAdmin(current.0.clone()))
    }
}
