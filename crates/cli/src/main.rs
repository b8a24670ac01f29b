//! Courier CLI
//!
//! Sends a single message through the `SparkPost` Transmissions API, or prints
//! the payload that would be sent.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

/// Courier CLI: deliver mail through SparkPost.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about)]
struct Cli {
    /// Path to a TOML file with SparkPost settings.
    #[arg(long, env = "COURIER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// SparkPost API key. Overrides `api_key` from the config file.
    #[arg(long, env = "SPARKPOST_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a message.
    Send(commands::send::SendArgs),
    /// Print the effective settings (API key redacted).
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = config::load(cli.config.as_deref(), cli.api_key.as_deref())?;

    match cli.command {
        Command::Send(args) => commands::send::run(settings, &args, &cli.format).await,
        Command::Settings => {
            println!("{settings:#?}");
            Ok(())
        }
    }
}
