use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tablectl_core::ServiceConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration (secrets masked)
    Show(FileArgs),
    /// Load and validate configuration
    Validate(FileArgs),
    /// Show default config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct FileArgs {
    /// Config file (default: ~/.tablectl/config.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Validate(args) => run_validate(args),
        ConfigCommands::Path => run_path(),
    }
}

fn run_show(args: FileArgs) -> Result<()> {
    let config = ServiceConfig::load(args.config.as_deref())?;
    let rendered = config
        .redacted()
        .to_toml()
        .context("Failed to serialize config to TOML")?;

    println!("{}", rendered);
    Ok(())
}

fn run_validate(args: FileArgs) -> Result<()> {
    let config = ServiceConfig::load(args.config.as_deref())?;
    config.validate()?;

    println!("✅ Configuration valid");
    println!("   store: {}", config.redacted().store.uri);
    println!("   bind:  {}", config.server.bind);
    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", ServiceConfig::config_path().display());
    Ok(())
}
