use shared::WeatherResponse;
use tracing::info;

use super::errors::DeskResult;
use super::notification_service::NotificationService;
use super::weather_service::WeatherService;

/// Looks up the weather and sends the summary out by email and SMS
#[derive(Clone)]
pub struct WeatherReportService {
    weather: WeatherService,
    notifications: NotificationService,
}

impl WeatherReportService {
    pub fn new(weather: WeatherService, notifications: NotificationService) -> Self {
        Self {
            weather,
            notifications,
        }
    }

    /// Lookup failures are returned; notification failures only show up in the report
    pub async fn report_weather(&self, city: &str) -> DeskResult<WeatherResponse> {
        let report = self.weather.current_weather(city).await?;
        let info = report.summary();
        info!("🌦️ {}", info);

        let subject = format!("Weather Update: {}", report.city);
        let notifications = self.notifications.broadcast(&subject, &info).await;

        Ok(WeatherResponse {
            report,
            info,
            notifications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TwilioConfig, WeatherConfig};
    use crate::domain::errors::DeskError;
    use crate::domain::sms_service::SmsService;
    use serde_json::json;
    use shared::DeliveryStatus;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_report_weather_sends_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "weather": [{"description": "clear sky"}],
                "main": {"temp": 21.5}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("Body=Madrid%3A+clear+sky%2C+21.5"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sid": "SM7"})))
            .expect(1)
            .mount(&server)
            .await;

        let weather = WeatherService::new(Some(WeatherConfig {
            api_key: "k".to_string(),
            base_url: format!("{}/weather", server.uri()),
            timeout_secs: 5,
        }))
        .unwrap();
        let sms = SmsService::new(Some(TwilioConfig {
            sid: Some("AC1".to_string()),
            auth_token: Some("t".to_string()),
            from_number: Some("+1".to_string()),
            to_number: Some("+2".to_string()),
            base_url: Some(server.uri()),
        }))
        .unwrap();
        let service = WeatherReportService::new(weather, NotificationService::new(None, sms));

        let response = service.report_weather("Madrid").await.unwrap();
        assert_eq!(response.info, "Madrid: clear sky, 21.5°C");
        assert_eq!(response.report.temperature, 21.5);
        assert!(matches!(response.notifications.email, DeliveryStatus::Skipped(_)));
        assert_eq!(response.notifications.sms, DeliveryStatus::Sent);
    }

    #[tokio::test]
    async fn test_lookup_failure_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let weather = WeatherService::new(Some(WeatherConfig {
            api_key: "k".to_string(),
            base_url: server.uri(),
            timeout_secs: 5,
        }))
        .unwrap();
        let service = WeatherReportService::new(
            weather,
            NotificationService::new(None, SmsService::new(None).unwrap()),
        );

        let err = service.report_weather("Atlantis").await.unwrap_err();
        assert!(matches!(err, DeskError::ExternalService(_)));
    }
}
