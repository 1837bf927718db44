use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::info;

use super::errors::{DeskError, DeskResult};
use crate::config::EmailConfig;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends plain-text mail to the configured receiver over SMTP with implicit TLS
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
    transport: SmtpTransport,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> DeskResult<Self> {
        info!(
            "📧 Initializing email service for SMTP server: {}:{}",
            config.smtp_server, config.smtp_port
        );

        let transport = SmtpTransport::relay(&config.smtp_server)
            .map_err(|e| DeskError::external(format!("failed to create SMTP relay: {e}")))?
            .port(config.smtp_port)
            .timeout(Some(SMTP_TIMEOUT))
            .credentials(Credentials::new(
                config.login.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { config, transport })
    }

    pub fn build_message(&self, subject: &str, body: &str) -> DeskResult<Message> {
        let from = self
            .config
            .sender_email
            .parse::<Mailbox>()
            .map_err(|e| DeskError::external(format!("invalid sender email: {e}")))?;
        let to = self
            .config
            .receiver_email
            .parse::<Mailbox>()
            .map_err(|e| DeskError::external(format!("invalid receiver email: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| DeskError::external(format!("failed to build email: {e}")))
    }

    /// One delivery attempt. SMTP is blocking, so it runs on the blocking pool.
    pub async fn send(&self, subject: &str, body: &str) -> DeskResult<()> {
        let email = self.build_message(subject, body)?;
        let transport = self.transport.clone();

        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| DeskError::external(format!("email task failed: {e}")))?
            .map_err(|e| DeskError::external(format!("failed to send email: {e}")))?;

        info!("📧 Email '{}' sent to {}", subject, self.config.receiver_email);
        Ok(())
    }
}
