mod cli;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod render;
mod schema;
mod state;
mod storage;
mod tailoring;

use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::CommandLine;
use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    let command_line = CommandLine::parse_args();

    // Configuration comes before logging so RUST_LOG from .env is honored
    let config = match Config::from_env().context("Failed to load configuration") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-tailor v{}", env!("CARGO_PKG_VERSION"));

    let result = match AppState::from_config(&config) {
        Ok(state) => cli::execute(command_line.command, &state).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.report();
            if e.is_retryable() {
                info!("Re-running the same command may succeed");
            }
            error!("Aborted with {code}");
            ExitCode::FAILURE
        }
    }
}
