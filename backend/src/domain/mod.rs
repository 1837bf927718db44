//! # Domain Module
//!
//! Business logic of the desk, independent of the shells that drive it.
//!
//! ## Module Organization
//!
//! - **calculator**: pure four-operator arithmetic
//! - **calculation_service**: compute, timestamp and record calculations
//! - **export_service**: CSV report of the full history
//! - **weather_service**: current conditions from the weather provider
//! - **email_service** / **sms_service**: single-attempt message delivery
//! - **notification_service**: best-effort fan-out over email and SMS
//! - **weather_report_service**: weather lookup followed by notification
//! - **errors**: the error categories every operation reports
//!
//! ## Business Rules
//!
//! - Only `+ - * /` are accepted; anything else is an invalid operation
//! - Division by zero is rejected before anything is stored
//! - Stored calculations are never changed or removed
//! - Notification failures are reported, never propagated or retried

pub mod calculation_service;
pub mod calculator;
pub mod email_service;
pub mod errors;
pub mod export_service;
pub mod notification_service;
pub mod sms_service;
pub mod weather_report_service;
pub mod weather_service;

pub use calculation_service::CalculationService;
pub use email_service::EmailService;
pub use errors::{DeskError, DeskResult};
pub use export_service::ExportService;
pub use notification_service::NotificationService;
pub use sms_service::SmsService;
pub use weather_report_service::WeatherReportService;
pub use weather_service::WeatherService;
