//! Wayfarer CLI entry point.

use clap::Parser;
use wayfarer_cli::{logging, run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads env-backed flags
    let dotenv = wayfarer_core::env::load_dotenv();

    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);

    match dotenv {
        Ok(Some(path)) => tracing::debug!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => tracing::warn!("Ignoring .env file: {}", e),
    }

    run(cli).await
}
