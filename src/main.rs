// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Args, Command};
use commands::{handle_config_update_command, handle_fetch_command, handle_list_config_command};
use football_fusion::error::AppError;
use logging::setup_logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Handle configuration operations before logging is set up
    if args.command.is_config_command() {
        return match args.command {
            Command::ListConfig => handle_list_config_command().await,
            Command::SetLogFile { path } => handle_config_update_command(Some(path)).await,
            _ => handle_config_update_command(None).await,
        };
    }

    let (log_file_path, _guard) = setup_logging(&args).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    handle_fetch_command(args.command).await
}
