//! tablectl CLI - restaurant orders backend
//!
//! - `serve`: run the HTTP API (orders, reservations, stats)
//! - `config`: inspect and validate configuration

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "tablectl",
    author,
    version,
    about = "REST backend for restaurant orders and reservations",
    long_about = "Serve orders, reservations and order stats for each restaurant \
                  from MongoDB. The `restaurant` query parameter picks the database."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Inspect configuration (show, validate, path)
    Config(commands::config::ConfigArgs),
}

/// Load `./.env`, then `~/.tablectl/.env`. Already-set variables win.
///
/// Runs before logging is set up so `.env` can carry `RUST_LOG`; returns the
/// failures to report once it is.
fn load_env_files() -> Vec<(PathBuf, dotenvy::Error)> {
    let mut paths = vec![PathBuf::from(".env")];
    if let Some(dir) = tablectl_core::ServiceConfig::config_path().parent() {
        paths.push(dir.join(".env"));
    }
    paths
        .into_iter()
        .filter_map(|path| load_env_file(&path).map(|e| (path, e)))
        .collect()
}

/// Load one `.env` file. A missing file is not an error.
fn load_env_file(path: &Path) -> Option<dotenvy::Error> {
    match dotenvy::from_path(path) {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let env_failures = load_env_files();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();
    for (path, error) in env_failures {
        tracing::debug!(path = %path.display(), error = %error, "Ignoring unreadable .env file");
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Config(args) => commands::run_config(args)?,
    }
    Ok(())
}
