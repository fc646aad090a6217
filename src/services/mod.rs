pub mod activity;
pub mod documents;
pub mod mail;
pub mod notify;
pub mod security;
pub mod uploads;

pub use activity::{ActivityAction, ActivityService, Actor};
pub use documents::DocumentKey;
pub use mail::Mailer;
pub use security::{
    create_session_token, decode_session_token, generate_reset_token, hash_password,
    verify_password,
};
