//! # calcdesk backend
//!
//! Calculator with a persisted history, CSV reporting, and a weather lookup
//! whose result is sent out by email and SMS.
//!
//! The backend is UI-agnostic; the CLI and the REST API in this crate are
//! both thin shells over the same services.
//!
//! ## Architecture
//!
//! ```text
//! Shells (CLI, REST API)
//!     ↓
//! Domain Layer (calculator, services, external collaborators)
//!     ↓
//! Storage Layer (SQLite history)
//! ```
//!
//! The database handle is opened once in [`initialize_backend`], handed to
//! the services through [`AppState`], and closed by [`AppState::shutdown`].

pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod rest;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{
    CalculationService, EmailService, ExportService, NotificationService, SmsService,
    WeatherReportService, WeatherService,
};
use crate::storage::{CalculationRepository, DbConnection};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub db: DbConnection,
    pub store: Arc<CalculationRepository>,
    pub calculation_service: CalculationService,
    pub export_service: ExportService,
    pub weather_report_service: WeatherReportService,
}

impl AppState {
    /// Release the database. Call once, when the shell is done.
    pub async fn shutdown(&self) {
        self.db.close().await;
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::open(&config.database.path)
        .await
        .with_context(|| format!("Failed to open history database {:?}", config.database.path))?;
    let store = Arc::new(CalculationRepository::new(db.clone()));

    info!("Setting up external services");
    let weather = WeatherService::new(config.weather.clone())?;
    let email = config
        .email
        .clone()
        .map(EmailService::new)
        .transpose()
        .context("Failed to set up email service")?;
    let sms = SmsService::new(config.twilio.clone())?;

    info!("Setting up domain model");
    let calculation_service = CalculationService::new(store.clone());
    let export_service = ExportService::new(config.export.default_path.clone());
    let weather_report_service =
        WeatherReportService::new(weather, NotificationService::new(email, sms));

    Ok(AppState {
        db,
        store,
        calculation_service,
        export_service,
        weather_report_service,
    })
}

/// Create the Axum router with all routes configured.
///
/// A CORS layer is added only when `cors_origins` lists browser origins.
pub fn create_router(app_state: AppState, cors_origins: &[String]) -> Result<Router> {
    let api_routes = Router::new()
        .route(
            "/calculations",
            get(rest::list_calculations).post(rest::create_calculation),
        )
        .route("/export", post(rest::export_calculations))
        .route("/weather", post(rest::report_weather));

    let mut router = Router::new().nest("/api", api_routes);

    if !cors_origins.is_empty() {
        let origins = cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin: {:?}", origin))
            })
            .collect::<Result<Vec<_>>>()?;
        let cors = CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any);
        router = router.layer(cors);
    }

    Ok(router
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
