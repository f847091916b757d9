//! skillgate server - authenticated webhook endpoint for a voice skill.
//!
//! Binds the HTTP boundary, wires the certificate cache and chain fetcher
//! into the authentication pipeline, and dispatches verified events.
//! Embedders register their own intents on [`dispatch::EventRouter`]; the
//! stock binary answers launches with a greeting.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use skillgate_auth::{ChainCache, NoopChainCache};
use skillgate_core::Response;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod cache;
mod config;
mod dispatch;
mod fetcher;
mod handler;

use cache::SqliteChainCache;
use config::ServerConfig;
use dispatch::EventRouter;
use fetcher::HttpChainFetcher;
use handler::AppState;

/// skillgate - authenticated webhook gateway
#[derive(Parser)]
#[command(name = "skillgate-server", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server (default if no command given)
    Serve,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Serve) | None => serve().await,
    }
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let cache: Box<dyn ChainCache> = match &config.cache_db {
        Some(path) => {
            tracing::info!(path = %path.display(), "Opening certificate cache");
            Box::new(SqliteChainCache::open(path).await?)
        }
        None => {
            tracing::warn!(
                "No cache database configured; every request will re-fetch its certificate chain"
            );
            Box::new(NoopChainCache)
        }
    };

    let fetcher = HttpChainFetcher::new(config.fetch_timeout)?;

    let events = EventRouter::new()
        .on_launch(|_| Ok(Response::new().with_speech("Welcome to skillgate.")))
        .on_session_ended(|_| Ok(Response::new()));

    let state = Arc::new(AppState {
        auth: config.auth.clone(),
        cache,
        fetcher: Box::new(fetcher),
        events,
    });

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    tracing::info!(listen = %config.listen, app_id = %config.auth.application_id(), "skillgate listening");

    axum::serve(listener, handler::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), initiating shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
