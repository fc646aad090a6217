use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC secret for signing session tokens.
    pub session_secret: String,
    /// Session lifetime in seconds.
    pub session_ttl_secs: i64,
    /// Lifetime of a password-reset token in seconds.
    pub reset_token_ttl_secs: i64,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    /// Public base URL of this service, used to build the OAuth callback URL.
    pub public_base_url: String,
    /// Built-in administrator account, created on first start when missing.
    pub admin_email: String,
    pub admin_password: String,
    pub admin_fullname: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            session_secret: env::var("ETEEAP_SESSION_SECRET")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),
            session_ttl_secs: env::var("ETEEAP_SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(604_800), // 7 days
            reset_token_ttl_secs: env::var("ETEEAP_RESET_TOKEN_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3_600), // 1 hour
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok(),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").ok(),
            public_base_url: env::var("ETEEAP_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            admin_email: env::var("ETEEAP_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@eteeap.com".to_string()),
            admin_password: env::var("ETEEAP_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "Admin123".to_string()),
            admin_fullname: env::var("ETEEAP_ADMIN_FULLNAME")
                .unwrap_or_else(|_| "Administrator".to_string()),
        }
    }
}
