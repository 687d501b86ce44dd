//! Casefile detective game entry point.

use std::error::Error;

use casefile_cli::config::{AppConfig, LogFormat};
use casefile_cli::play;
use casefile_cli::state::AppState;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Read configuration from environment.
    let config = AppConfig::from_env()?;

    // Initialize tracing subscriber. Logs go to stderr so they never mix
    // with the game screens on stdout.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }

    tracing::info!(
        save_file = %config.save_file.display(),
        feedback_delay = ?config.feedback_delay,
        "Starting Casefile"
    );

    // Build application state.
    let state = AppState::from_config(&config).await?;

    let mut input = BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    play::run(&state, &mut input, &mut output).await?;

    tracing::info!("Goodbye");
    Ok(())
}
