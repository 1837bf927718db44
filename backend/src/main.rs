use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use calcdesk::cli::{self, Cli};
use calcdesk::config::AppConfig;
use calcdesk::initialize_backend;
use calcdesk::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // The real subscriber depends on the config, so report loading problems on stderr
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .finish();
    let config = match tracing::subscriber::with_default(bootstrap, || {
        AppConfig::load_or_default(&cli.config)
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = match initialize_backend(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Startup failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = cli::run(cli.command, &state, &config.server).await;
    state.shutdown().await;
    info!("History store closed");

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
