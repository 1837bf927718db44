use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use super::errors::{DeskError, DeskResult};
use crate::config::TwilioConfig;

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

/// Sends text messages through the Twilio Messages API
#[derive(Clone)]
pub struct SmsService {
    client: Client,
    config: Option<TwilioConfig>,
}

impl SmsService {
    pub fn new(config: Option<TwilioConfig>) -> DeskResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DeskError::external(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Whether every Twilio credential is configured
    pub fn is_configured(&self) -> bool {
        self.config.as_ref().is_some_and(TwilioConfig::is_complete)
    }

    /// One delivery attempt; returns the provider's message sid
    pub async fn send(&self, message: &str) -> DeskResult<String> {
        let config = self
            .config
            .as_ref()
            .filter(|c| c.is_complete())
            .ok_or_else(|| DeskError::external("Twilio config missing"))?;

        // is_complete guarantees these are present
        let sid = config.sid.as_deref().unwrap_or_default();
        let token = config.auth_token.as_deref().unwrap_or_default();
        let from = config.from_number.as_deref().unwrap_or_default();
        let to = config.to_number.as_deref().unwrap_or_default();

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            config.api_base().trim_end_matches('/'),
            sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(sid, Some(token))
            .form(&[("To", to), ("From", from), ("Body", message)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DeskError::external(format!("failed to send SMS: {}", e.without_url())))?;

        let resource: MessageResource = response
            .json()
            .await
            .map_err(|e| DeskError::external(format!("malformed SMS response: {}", e.without_url())))?;

        info!("📱 SMS sent: {}", resource.sid);
        Ok(resource.sid)
    }
}
