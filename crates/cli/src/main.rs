//! ctxroute CLI entry point.
//!
//! Commands:
//! - `route`   Read one routing request on stdin, print the decision
//! - `logs`    Show recent routing decisions
//! - `config`  Show or edit the global configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "ctxroute",
    about = "ctxroute: pick the docs and skills an AI agent should read next",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Route one conversation turn (JSON on stdin, JSON on stdout)
    Route {
        /// Extra config file layered over the global one
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show recent routing decisions
    Logs {
        /// Number of entries to show
        #[arg(long, default_value_t = 20)]
        last: usize,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Set a key in the global config file
    Set {
        /// api-key, api-key-env, model, base-url, api-style or timeout
        key: String,
        value: String,
    },

    /// Delete the global config file
    Reset,

    /// Print the global config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // stdout is reserved for command output
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Route { config } => commands::route::run(config).await?,
        Commands::Logs { last } => commands::logs::run(last).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Set { key, value } => commands::config_cmd::set(&key, &value).await?,
            ConfigAction::Reset => commands::config_cmd::reset().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
    }

    Ok(())
}
