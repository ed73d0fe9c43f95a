//! health-server - HTTP exposure of the aggregate health status

#![allow(missing_docs)]

use clap::Parser;
use runtime_health::server;
use runtime_health::utils::logging::init_tracing;
use runtime_health::{HealthServerConfig, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "health-server", version, about = "Serve the aggregate health status over HTTP")]
struct Args {
    /// YAML configuration file; HEALTH_* variables are used when omitted
    #[arg(short, long, env = "HEALTH_CONFIG")]
    config: Option<PathBuf>,
}

async fn load_config(args: &Args) -> Result<HealthServerConfig> {
    match &args.config {
        Some(path) => HealthServerConfig::from_file(path).await,
        None => HealthServerConfig::from_env(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = match load_config(&args).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match server::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Health server failed");
            ExitCode::FAILURE
        }
    }
}
