//! Outbound mail via SMTP.
//!
//! When no SMTP host is configured the mailer runs disabled: messages are
//! traced instead of sent, which keeps local development and tests free of
//! a mail relay.

use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::mail::MailConfig;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from_address: String,
    from_name: String,
}

impl Mailer {
    pub fn from_config(config: &MailConfig) -> Self {
        let transport = if config.smtp_host.is_empty() {
            tracing::warn!("No SMTP host configured; outbound mail is disabled");
            None
        } else {
            match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host) {
                Ok(builder) => Some(
                    builder
                        .port(config.smtp_port)
                        .credentials(Credentials::new(
                            config.smtp_username.clone(),
                            config.smtp_password.clone(),
                        ))
                        .build(),
                ),
                Err(e) => {
                    tracing::error!("Failed to create SMTP transport: {}", e);
                    None
                }
            }
        };

        Self {
            transport,
            from_address: config.from_address.clone(),
            from_name: config.from_name.clone(),
        }
    }

    /// A mailer that never sends; used by tests.
    pub fn disabled() -> Self {
        Self {
            transport: None,
            from_address: "no-reply@localhost".to_string(),
            from_name: "Test".to_string(),
        }
    }

    pub async fn send_password_reset(
        &self,
        to: &str,
        fullname: &str,
        reset_url: &str,
    ) -> Result<()> {
        let body = format!(
            "<p>Hello {},</p>\
             <p>You requested a password reset. Click the link below:</p>\
             <a href=\"{}\" target=\"_blank\">Reset Password</a>\
             <p>This link expires in 1 hour.</p>",
            fullname, reset_url
        );

        self.send(to, "Password Reset Request", &body).await
    }

    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<()> {
        let transport = match &self.transport {
            Some(t) => t,
            None => {
                tracing::info!("Mail disabled; would send '{}' to {}", subject, to);
                return Ok(());
            }
        };

        let from = format!("{} <{}>", self.from_name, self.from_address);
        let from_mailbox = from
            .parse()
            .map_err(|_| AppError::Internal("Invalid from address".to_string()))?;
        let to_mailbox = to
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid recipient email address".to_string()))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        transport.send(email).await?;
        Ok(())
    }
}
