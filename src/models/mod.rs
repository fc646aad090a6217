pub mod activity_log;
pub mod application;
pub mod document_remark;
pub mod notification_read;
pub mod password_reset;
pub mod user;
pub mod verified_file;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::activity_log::{self, Entity as ActivityLog};
    pub use super::application::{self, Entity as Application};
    pub use super::document_remark::{self, Entity as DocumentRemark};
    pub use super::notification_read::{self, Entity as NotificationRead};
    pub use super::password_reset::{self, Entity as PasswordReset};
    pub use super::user::{self, Entity as User};
    pub use super::verified_file::{self, Entity as VerifiedFile};
}
