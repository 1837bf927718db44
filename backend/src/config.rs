//! Application configuration, read once at startup from a TOML file.
//!
//! Every section is optional. A missing `weather`, `email` or `twilio`
//! section disables that collaborator instead of failing startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::domain::export_service::DEFAULT_EXPORT_FILE;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
    pub weather: Option<WeatherConfig>,
    pub email: Option<EmailConfig>,
    pub twilio: Option<TwilioConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("history.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Browser origins allowed by CORS; none means no CORS layer
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Log to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some(PathBuf::from("calculator.log")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub default_path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_path: PathBuf::from(DEFAULT_EXPORT_FILE),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,
    #[serde(default = "WeatherConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "WeatherConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl WeatherConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://api.openweathermap.org/data/2.5/weather";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    fn default_base_url() -> String {
        Self::DEFAULT_BASE_URL.to_string()
    }

    fn default_timeout_secs() -> u64 {
        Self::DEFAULT_TIMEOUT_SECS
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_server: String,
    #[serde(default = "EmailConfig::default_port")]
    pub smtp_port: u16,
    pub login: String,
    pub password: String,
    pub sender_email: String,
    pub receiver_email: String,
}

impl EmailConfig {
    fn default_port() -> u16 {
        465
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TwilioConfig {
    pub sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: Option<String>,
    pub to_number: Option<String>,
    pub base_url: Option<String>,
}

impl TwilioConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.twilio.com";

    /// All four credentials are present and non-blank
    pub fn is_complete(&self) -> bool {
        [&self.sid, &self.auth_token, &self.from_number, &self.to_number]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    pub fn api_base(&self) -> &str {
        self.base_url.as_deref().unwrap_or(Self::DEFAULT_BASE_URL)
    }
}

impl AppConfig {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig =
            toml::from_str(content).context("Failed to parse configuration TOML")?;

        if let Some(weather) = &config.weather {
            if weather.api_key.trim().is_empty() {
                return Err(anyhow::anyhow!("weather.api_key must not be empty"));
            }
        }
        if let Some(email) = &config.email {
            if email.sender_email.is_empty() || email.receiver_email.is_empty() {
                return Err(anyhow::anyhow!("email.sender_email and email.receiver_email are required"));
            }
        }

        Ok(config)
    }

    pub fn load(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {:?}", config_path))
    }

    /// Load the file, or use defaults (collaborators disabled) when it does not exist.
    ///
    /// A file that exists but cannot be read, parsed or validated is an error.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        match fs::read_to_string(config_path) {
            Ok(content) => {
                let config = Self::from_toml(&content)
                    .with_context(|| format!("Invalid config file: {:?}", config_path))?;
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("No config file at {:?}", config_path);
                info!("Using default config (weather and notifications disabled)");
                Ok(AppConfig::default())
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Failed to read config file: {:?}", config_path))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL_CONFIG: &str = r#"
        [database]
        path = "/var/lib/calcdesk/history.db"

        [server]
        bind = "0.0.0.0:8080"

        [logging]
        level = "debug"
        file = "desk.log"

        [export]
        default_path = "reports/history.csv"

        [weather]
        api_key = "abc123"

        [email]
        smtp_server = "smtp.example.com"
        login = "mailer"
        password = "hunter2"
        sender_email = "desk@example.com"
        receiver_email = "me@example.com"

        [twilio]
        sid = "AC123"
        auth_token = "token"
        from_number = "+15550001"
        to_number = "+15550002"
    "#;

    #[test]
    fn test_full_config() {
        let config = AppConfig::from_toml(FULL_CONFIG).unwrap();

        assert_eq!(config.database.path, PathBuf::from("/var/lib/calcdesk/history.db"));
        assert_eq!(config.server.bind.port(), 8080);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.export.default_path, PathBuf::from("reports/history.csv"));

        let weather = config.weather.unwrap();
        assert_eq!(weather.base_url, WeatherConfig::DEFAULT_BASE_URL);
        assert_eq!(weather.timeout_secs, 10);

        let email = config.email.unwrap();
        assert_eq!(email.smtp_port, 465);
        assert_eq!(email.login, "mailer");

        assert!(config.twilio.unwrap().is_complete());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();

        assert_eq!(config.database.path, PathBuf::from("history.db"));
        assert_eq!(config.server.bind, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.logging.file, Some(PathBuf::from("calculator.log")));
        assert_eq!(config.export.default_path, PathBuf::from("calculation_report.csv"));
        assert!(config.weather.is_none());
        assert!(config.email.is_none());
        assert!(config.twilio.is_none());
    }

    #[test]
    fn test_partial_twilio_is_incomplete() {
        let config = AppConfig::from_toml("[twilio]\nsid = \"AC1\"\nauth_token = \"t\"\n").unwrap();
        let twilio = config.twilio.unwrap();
        assert!(!twilio.is_complete());
        assert_eq!(twilio.api_base(), TwilioConfig::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_blank_weather_key_rejected() {
        assert!(AppConfig::from_toml("[weather]\napi_key = \" \"\n").is_err());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(AppConfig::from_toml("[database\npath = 1").is_err());
    }

    #[test]
    fn test_load_or_default_with_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert!(config.weather.is_none());
        assert_eq!(config.database.path, PathBuf::from("history.db"));
    }

    #[test]
    fn test_load_or_default_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[database]\npath = \"/srv/desk/history.db\"\n\n[weather]\napi_key = \"\"\n",
        )
        .unwrap();

        let err = AppConfig::load_or_default(&path).unwrap_err();
        assert!(format!("{err:#}").contains("weather.api_key"));

        fs::write(&path, "[database\npath = 1").unwrap();
        assert!(AppConfig::load_or_default(&path).is_err());
    }

    #[test]
    fn test_load_or_default_reads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[database]\npath = \"/srv/desk/history.db\"\n").unwrap();

        let config = AppConfig::load_or_default(&path).unwrap();
        assert_eq!(config.database.path, PathBuf::from("/srv/desk/history.db"));
    }

    #[test]
    fn test_cors_origins() {
        assert!(AppConfig::default().server.cors_origins.is_empty());

        let config =
            AppConfig::from_toml("[server]\ncors_origins = [\"http://localhost:5173\"]\n").unwrap();
        assert_eq!(config.server.cors_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.server.bind.port(), 3000);
    }

    #[test]
    fn test_example_config_parses() {
        let config = AppConfig::from_toml(include_str!("../../config.example.toml")).unwrap();
        assert!(config.weather.is_some());
        assert!(config.email.is_some());
        assert!(config.twilio.unwrap().is_complete());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, FULL_CONFIG).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert!(config.email.is_some());
    }
}
