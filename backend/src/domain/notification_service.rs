//! Best-effort notification fan-out.
//!
//! Delivery failures are logged and reported back to the caller as a
//! [`DeliveryStatus`]; they never abort the action that triggered them and
//! are never retried.

use shared::{DeliveryStatus, NotificationReport};
use tracing::{error, warn};

use super::email_service::EmailService;
use super::sms_service::SmsService;

#[derive(Clone)]
pub struct NotificationService {
    email: Option<EmailService>,
    sms: SmsService,
}

impl NotificationService {
    pub fn new(email: Option<EmailService>, sms: SmsService) -> Self {
        Self { email, sms }
    }

    pub async fn send_email(&self, subject: &str, body: &str) -> DeliveryStatus {
        let Some(email) = &self.email else {
            warn!("⚠ Email config missing, skipping email.");
            return DeliveryStatus::Skipped("email is not configured".to_string());
        };

        match email.send(subject, body).await {
            Ok(()) => DeliveryStatus::Sent,
            Err(e) => {
                error!("❌ Email error: {}", e);
                DeliveryStatus::Failed(e.to_string())
            }
        }
    }

    pub async fn send_sms(&self, message: &str) -> DeliveryStatus {
        if !self.sms.is_configured() {
            warn!("⚠ Twilio config missing, skipping SMS.");
            return DeliveryStatus::Skipped("Twilio config missing".to_string());
        }

        match self.sms.send(message).await {
            Ok(_) => DeliveryStatus::Sent,
            Err(e) => {
                error!("❌ SMS error: {}", e);
                DeliveryStatus::Failed(e.to_string())
            }
        }
    }

    /// Email first, then SMS, regardless of whether the email went out
    pub async fn broadcast(&self, subject: &str, body: &str) -> NotificationReport {
        let email = self.send_email(subject, body).await;
        let sms = self.send_sms(body).await;
        NotificationReport { email, sms }
    }
}
