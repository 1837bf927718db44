use reqwest::Client;
use serde::Deserialize;
use shared::WeatherReport;
use std::time::Duration;
use tracing::{error, info};

use super::errors::{DeskError, DeskResult};
use crate::config::WeatherConfig;

/// Payload subset of the provider's current-weather response
#[derive(Debug, Deserialize)]
struct WeatherPayload {
    weather: Vec<WeatherCondition>,
    main: WeatherMain,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: f64,
}

/// Client for an OpenWeatherMap-compatible current-weather endpoint
#[derive(Clone)]
pub struct WeatherService {
    client: Client,
    config: Option<WeatherConfig>,
}

impl WeatherService {
    /// Build the client. With no config every lookup fails with an external service error.
    pub fn new(config: Option<WeatherConfig>) -> DeskResult<Self> {
        let timeout = config
            .as_ref()
            .map(|c| c.timeout_secs)
            .unwrap_or(WeatherConfig::DEFAULT_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| DeskError::external(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Current conditions for `city`, temperature in Celsius
    pub async fn current_weather(&self, city: &str) -> DeskResult<WeatherReport> {
        let city = city.trim();
        if city.is_empty() {
            return Err(DeskError::external("city name is required"));
        }
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| DeskError::external("weather provider is not configured"))?;

        info!("🌦️ Requesting weather for {}", city);

        let response = self
            .client
            .get(&config.base_url)
            .query(&[("q", city), ("appid", config.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                let e = e.without_url();
                error!("Weather request for {} failed: {}", city, e);
                DeskError::external(e)
            })?;

        let payload: WeatherPayload = response.json().await.map_err(|e| {
            let e = e.without_url();
            error!("Weather response for {} was malformed: {}", city, e);
            DeskError::external(format!("malformed weather response: {e}"))
        })?;

        let description = payload
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| DeskError::external("weather response has no conditions"))?;

        Ok(WeatherReport {
            city: city.to_string(),
            description,
            temperature: payload.main.temp,
        })
    }
}
