use std::path::PathBuf;

use agary::{cli, config, server};
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agary", version, about = "AI-assisted personal CRM service")]
struct Cli {
    /// Config file (defaults to ~/.agary/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve,
    /// Manage API users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Embed every contact that has no search vector yet
    Embed,
    /// Check the database and provider configuration
    Doctor,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user and print their bearer token
    Create { name: String },
    /// List users
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::AgaryConfig::load_from(path)?,
        None => config::AgaryConfig::load()?,
    };

    // Log to stderr so stdout stays clean for command output (tokens, reports).
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    for warning in &config.load_warnings {
        tracing::warn!("{warning}");
    }

    match cli.command {
        Command::Serve => server::serve(config).await?,
        Command::User { action } => match action {
            UserAction::Create { name } => cli::user::create(&config, &name)?,
            UserAction::List => cli::user::list(&config)?,
        },
        Command::Embed => cli::embed::embed(&config).await?,
        Command::Doctor => cli::doctor::doctor(&config)?,
    }

    Ok(())
}
