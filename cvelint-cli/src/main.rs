//! cvelint -- command-line front end for the cvebase document linter.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::path::Path;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use cvelint_core::config::{CvelintConfig, GeneralConfig};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "cvelint failed");
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        config: config_path,
        log_level,
        output,
        command,
    } = cli;
    let writer = OutputWriter::new(output);

    match command {
        Commands::Config(args) => {
            // validate must report a broken file, so logging starts from defaults
            init_logging(&GeneralConfig::default(), log_level.as_deref())?;
            commands::config::execute(args, &config_path, &writer).await
        }
        Commands::Lint(args) => {
            let config = load_config(&config_path, log_level.as_deref()).await?;
            commands::lint::execute(args, &config, &writer, shutdown_token()).await
        }
        Commands::Export(args) => {
            let config = load_config(&config_path, log_level.as_deref()).await?;
            commands::export::execute(args, &config, &writer, shutdown_token()).await
        }
    }
}

/// Load configuration (missing file means defaults), then start logging and metrics.
async fn load_config(path: &Path, log_level: Option<&str>) -> Result<CvelintConfig, CliError> {
    let config = CvelintConfig::load_or_default(path).await?;
    init_logging(&config.general, log_level)?;
    cvelint_core::metrics::describe_all();
    tracing::info!(config = %path.display(), "cvelint starting");
    Ok(config)
}

fn init_logging(general: &GeneralConfig, log_level: Option<&str>) -> Result<(), CliError> {
    logging::init_tracing(general, log_level).map_err(|e| CliError::Command(e.to_string()))
}

/// Cancellation token that fires on Ctrl-C.
fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let on_signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            on_signal.cancel();
        }
    });
    token
}
