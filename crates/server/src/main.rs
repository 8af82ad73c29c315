//! Filedrop server binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use filedrop_core::config::AppConfig;
use filedrop_server::bootstrap::initialize;
use filedrop_server::{AppState, create_router, reconcile_orphans};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filedrop - a file upload and metadata service
#[derive(Parser, Debug)]
#[command(name = "filedropd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "FILEDROP_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Remove records whose files no longer exist, then exit
    Reconcile,
}

/// Load configuration from an optional TOML file overlaid with `FILEDROP_*` env vars.
fn load_config(config_path: &str) -> Result<AppConfig> {
    let mut figment = Figment::new();

    if std::path::Path::new(config_path).exists() {
        tracing::info!(config_path = %config_path, "Loading configuration from file");
        figment = figment.merge(Toml::file(config_path));
    } else {
        tracing::debug!("No config file found at {}, using defaults", config_path);
    }

    figment
        .merge(Env::prefixed("FILEDROP_").split("__"))
        .extract()
        .context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Filedrop v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;
    let state = initialize(config).await?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(state).await,
        Command::Reconcile => run_reconcile(&state).await,
    }
}

async fn serve(state: AppState) -> Result<()> {
    let addr: SocketAddr = state
        .config
        .server
        .bind
        .parse()
        .context("invalid bind address")?;

    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn run_reconcile(state: &AppState) -> Result<()> {
    let stats = reconcile_orphans(state.metadata.as_ref(), state.storage.as_ref())
        .await
        .context("reconciliation failed")?;

    println!("Removed {} orphaned file records", stats.records_removed);
    if stats.errors > 0 {
        anyhow::bail!(
            "{} of {} records could not be reconciled",
            stats.errors,
            stats.records_scanned
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
