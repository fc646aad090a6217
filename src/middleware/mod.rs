pub mod auth;
pub mod identity;
pub mod security_headers;

pub use auth::require_session;
pub use auth::CurrentUser;
pub use identity::{Authenticated, RequireAdmin};
pub use security_headers::security_headers;
