//! REST server for the in-memory Patient store.
//!
//! Parses the command line, builds the store and router, and serves until
//! Ctrl+C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use patient_store_api::{router::Router, server::Server};
use patient_store_core::{config::ServerConfig, PatientStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the Patient server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Directory with the front-end files; a bundled page is served when omitted
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Request body timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Largest accepted request body in bytes
    #[arg(long, default_value_t = 100 * 1024)]
    max_body_bytes: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            static_dir: args.static_dir,
            request_timeout_ms: args.request_timeout_ms,
            max_body_bytes: args.max_body_bytes,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from(args);
    let addr = config
        .socket_addr()
        .with_context(|| format!("Invalid listen address {}:{}", config.host, config.port))?;

    if let Some(dir) = &config.static_dir {
        if !dir.is_dir() {
            tracing::warn!("Static directory {} does not exist", dir.display());
        }
    }

    println!("Starting Patient server...");
    println!("  Host: {}", config.host);
    println!("  Port: {}", config.port);
    match &config.static_dir {
        Some(dir) => println!("  Static directory: {}", dir.display()),
        None => println!("  Static directory: (bundled page)"),
    }
    println!("  Request timeout: {} ms", config.request_timeout_ms);
    println!("  Max body size: {} bytes", config.max_body_bytes);

    let store = Arc::new(PatientStore::new());
    let router = Router::new(store, Arc::new(config));
    let server = Server::new(addr, router);

    let mut server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            tracing::error!("Server error: {}", e);
        }
    });

    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("Failed to listen for ctrl_c")?;
            println!("\nShutting down server...");
        }
        _ = &mut server_handle => {
            anyhow::bail!("Server stopped unexpectedly");
        }
    }
    server_handle.abort();

    Ok(())
}
