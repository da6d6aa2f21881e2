mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use family_tree::config::TreeConfig;
use family_tree::server;

#[derive(Parser)]
#[command(name = "family-tree", version, about = "Family tree REST API over JSON documents")]
struct Cli {
    /// Config file (defaults to ~/.family-tree/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API
    Serve,
    /// Load every record and print the integrity report
    Check,
    /// Delete every person and the tree metadata
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TreeConfig::load_from(path)?,
        None => TreeConfig::load()?,
    };

    // Log to stderr so `check` output on stdout stays clean.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve_http(config).await?,
        Command::Check => {
            if !cli::check::check(&config)? {
                std::process::exit(1);
            }
        }
        Command::Reset { yes } => cli::reset::reset(&config, yes)?,
    }

    Ok(())
}
