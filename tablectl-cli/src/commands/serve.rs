//! HTTP server command
//!
//! Loads configuration, connects to the store (fatal on failure) and serves
//! until Ctrl+C / SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use tablectl_core::ServiceConfig;
use tablectl_server::{
    run_server, CorsPolicy, DocumentStore, MemoryStore, MongoStore, ServerConfig,
};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// MongoDB connection string (overrides config/environment)
    #[arg(long, env = "TABLECTL_MONGODB_URI", hide_env_values = true)]
    pub mongodb_uri: Option<String>,

    /// Store connect timeout in milliseconds
    #[arg(long)]
    pub connect_timeout_ms: Option<u64>,

    /// Allow only this browser origin instead of any (repeatable)
    #[arg(long = "cors-origin", value_name = "ORIGIN")]
    pub cors_origins: Vec<String>,

    /// Config file (default: ~/.tablectl/config.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Serve from an in-memory store instead of MongoDB (data is lost on exit)
    #[arg(long)]
    pub memory: bool,
}

impl ServeArgs {
    /// Merge CLI flags over file and environment config
    fn resolve_config(&self) -> Result<ServiceConfig> {
        let mut config = ServiceConfig::load(self.config.as_deref())?;

        if let Some(bind) = self.bind {
            config.server.bind = bind.to_string();
        }
        if let Some(uri) = &self.mongodb_uri {
            config.store.uri = uri.clone();
        }
        if let Some(timeout) = self.connect_timeout_ms {
            config.store.connect_timeout_ms = timeout;
        }
        if !self.cors_origins.is_empty() {
            config.server.cors_permissive = false;
            config.server.cors_origins = self.cors_origins.clone();
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let bind_addr = config.bind_addr()?;

    let store: Arc<dyn DocumentStore> = if args.memory {
        tracing::warn!("Using in-memory store, data will not persist");
        Arc::new(MemoryStore::new())
    } else {
        let redacted = config.redacted();
        tracing::info!(uri = %redacted.store.uri, "Connecting to MongoDB");
        match MongoStore::connect(&config.store).await {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::error!(error = %e, "MongoDB connection failed");
                return Err(e).context("Failed to connect to MongoDB");
            }
        }
    };

    let server_config = ServerConfig {
        bind_addr,
        cors: CorsPolicy::from_config(config.server.cors_permissive, &config.server.cors_origins),
    };

    // Run server (blocks until shutdown)
    run_server(store, server_config)
        .await
        .context("Server error")?;

    Ok(())
}
