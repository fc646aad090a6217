use std::env;

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP relay host. When empty, outbound mail is disabled and messages
    /// are logged instead of sent.
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    pub from_name: String,
}

impl MailConfig {
    pub fn from_env() -> Self {
        Self {
            smtp_host: env::var("ETEEAP_SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("ETEEAP_SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            smtp_username: env::var("ETEEAP_SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("ETEEAP_SMTP_PASSWORD").unwrap_or_default(),
            from_address: env::var("ETEEAP_MAIL_FROM")
                .unwrap_or_else(|_| "no-reply@lccb-eteeap.com".to_string()),
            from_name: env::var("ETEEAP_MAIL_FROM_NAME")
                .unwrap_or_else(|_| "LCCB ETEEAP Support".to_string()),
        }
    }
}
