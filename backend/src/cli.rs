//! Command-line shell: each subcommand runs one backend operation and prints
//! the outcome.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::{CalculationRecord, DeliveryStatus, WeatherResponse};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::{ServerConfig, DEFAULT_CONFIG_FILE};
use crate::{create_router, AppState};

#[derive(Debug, Parser)]
#[command(author, version, about = "Calculator with history, CSV reports and weather alerts", long_about = None)]
pub struct Cli {
    /// Configuration file
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Compute A OP B and record it in the history
    Calc {
        #[arg(allow_negative_numbers = true)]
        a: f64,
        /// One of + - * /
        op: String,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
    /// Print every recorded calculation, oldest first
    History,
    /// Write the full history to a CSV report
    Export {
        /// Destination file (defaults to export.default_path)
        #[arg(long, short)]
        output: Option<String>,
    },
    /// Look up the weather for a city and send it out by email and SMS
    Weather { city: String },
    /// Run the REST API
    Serve {
        /// Overrides server.bind
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

/// Run one command against an initialized backend
pub async fn run(command: Commands, state: &AppState, server: &ServerConfig) -> Result<()> {
    match command {
        Commands::Calc { a, op, b } => {
            let record = state.calculation_service.calculate(a, &op, b).await?;
            println!("Result: {}", record.result);
        }
        Commands::History => {
            let records = state.calculation_service.history().await?;
            if records.is_empty() {
                println!("No calculations recorded yet");
            }
            for record in &records {
                println!("{}", format_record(record));
            }
        }
        Commands::Export { output } => {
            let destination = state.export_service.resolve_destination(output.as_deref());
            let response = state
                .export_service
                .export_to_csv(state.store.as_ref(), &destination)
                .await?;
            println!(
                "Exported {} calculations to {}",
                response.record_count, response.file_path
            );
        }
        Commands::Weather { city } => {
            let response = state.weather_report_service.report_weather(&city).await?;
            print!("{}", format_weather(&response));
        }
        Commands::Serve { bind } => {
            serve(state.clone(), bind.unwrap_or(server.bind), &server.cors_origins).await?
        }
    }
    Ok(())
}

/// Serve the REST API until Ctrl-C
pub async fn serve(state: AppState, addr: SocketAddr, cors_origins: &[String]) -> Result<()> {
    let app = create_router(state, cors_origins)?;

    info!("Starting server on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;
    Ok(())
}

pub fn format_record(record: &CalculationRecord) -> String {
    format!(
        "#{} [{}] {} {} {} = {}",
        record.id,
        record.timestamp,
        record.operand_a,
        record.operator,
        record.operand_b,
        record.result
    )
}

fn format_delivery(status: &DeliveryStatus) -> String {
    match status {
        DeliveryStatus::Sent => "sent".to_string(),
        DeliveryStatus::Skipped(reason) => format!("skipped ({})", reason),
        DeliveryStatus::Failed(reason) => format!("failed ({})", reason),
    }
}

pub fn format_weather(response: &WeatherResponse) -> String {
    format!(
        "{}\nemail: {}\nsms: {}\n",
        response.info,
        format_delivery(&response.notifications.email),
        format_delivery(&response.notifications.sms)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::initialize_backend;
    use shared::{NotificationReport, Operator, WeatherReport};
    use tempfile::TempDir;

    #[test]
    fn test_parse_calc_with_negative_operands() {
        let cli = Cli::try_parse_from(["calcdesk", "calc", "-3.5", "-", "-2"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        match cli.command {
            Commands::Calc { a, op, b } => {
                assert_eq!(a, -3.5);
                assert_eq!(op, "-");
                assert_eq!(b, -2.0);
            }
            other => panic!("Unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_config_and_export_output() {
        let cli = Cli::try_parse_from([
            "calcdesk", "export", "--output", "out.csv", "--config", "desk.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("desk.toml"));
        assert!(matches!(cli.command, Commands::Export { output: Some(ref o) } if o == "out.csv"));
    }

    #[test]
    fn test_parse_serve_bind() {
        let cli = Cli::try_parse_from(["calcdesk", "serve", "--bind", "0.0.0.0:8000"]).unwrap();
        match cli.command {
            Commands::Serve { bind } => assert_eq!(bind, Some("0.0.0.0:8000".parse().unwrap())),
            other => panic!("Unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_missing_operand() {
        assert!(Cli::try_parse_from(["calcdesk", "calc", "1", "+"]).is_err());
        assert!(Cli::try_parse_from(["calcdesk", "calc", "x", "+", "1"]).is_err());
    }

    #[test]
    fn test_format_record() {
        let record = CalculationRecord {
            id: 1,
            timestamp: "2023-01-01T00:00:00".to_string(),
            operand_a: 3.0,
            operator: Operator::Add,
            operand_b: 4.0,
            result: 7.0,
        };
        assert_eq!(format_record(&record), "#1 [2023-01-01T00:00:00] 3 + 4 = 7");
    }

    #[test]
    fn test_format_weather() {
        let response = WeatherResponse {
            report: WeatherReport {
                city: "Oslo".to_string(),
                description: "light snow".to_string(),
                temperature: -2.0,
            },
            info: "Oslo: light snow, -2°C".to_string(),
            notifications: NotificationReport {
                email: DeliveryStatus::Sent,
                sms: DeliveryStatus::Skipped("Twilio config missing".to_string()),
            },
        };
        assert_eq!(
            format_weather(&response),
            "Oslo: light snow, -2°C\nemail: sent\nsms: skipped (Twilio config missing)\n"
        );
    }

    #[tokio::test]
    async fn test_run_calc_then_export() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.database.path = dir.path().join("history.db");
        let state = initialize_backend(&config).await.unwrap();
        let output = dir.path().join("out.csv");

        run(
            Commands::Calc { a: 3.0, op: "+".to_string(), b: 4.0 },
            &state,
            &config.server,
        )
        .await
        .unwrap();
        run(
            Commands::Export { output: Some(output.to_string_lossy().into_owned()) },
            &state,
            &config.server,
        )
        .await
        .unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.trim_end().ends_with(",3.0,+,4.0,7.0"));
        state.shutdown().await;
    }

    #[tokio::test]
    async fn test_run_division_by_zero_fails() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.database.path = dir.path().join("history.db");
        let state = initialize_backend(&config).await.unwrap();

        let err = run(
            Commands::Calc { a: 5.0, op: "/".to_string(), b: 0.0 },
            &state,
            &config.server,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Cannot divide by zero");
        assert!(state.calculation_service.history().await.unwrap().is_empty());
    }
}
