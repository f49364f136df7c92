//! Wayfarer command-line interface.

pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};

/// Wayfarer - travel planning chat assistant
#[derive(Parser)]
#[command(name = "wayfarer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat server
    Serve(commands::serve::ServeArgs),

    /// Build the knowledge base index
    BuildKb(commands::build_kb::BuildKbArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await,
        Commands::BuildKb(args) => commands::build_kb::run(args).await,
        Commands::Version => {
            println!("wayfarer {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
