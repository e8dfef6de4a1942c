use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use job_portal_api::config::{AppConfig, Environment};
use job_portal_api::database::{DatabaseManager, DocumentStore, MemoryStore};
use job_portal_api::{app, AppState};

#[derive(Parser, Debug)]
#[command(name = "job-portal-api", version, about = "Job portal HTTP API")]
struct Args {
    /// Bind address (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and ACCESS_TOKEN_SECRET are picked up
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let mut config = AppConfig::from_env();
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }

    tracing::info!("Starting job portal API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("ACCESS_TOKEN_SECRET is not set; session tokens cannot be issued");
    }

    let store = open_store(&config).await?;
    let bind_addr = format!("{}:{}", config.api.host, config.api.port);
    let state = AppState::new(config, store.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("job_portal_api=info,tower_http=info"));

    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    if config.database.url.is_some() {
        let manager = DatabaseManager::connect(&config.database)
            .await
            .context("failed to connect to the database")?;
        return Ok(Arc::new(manager));
    }

    match config.environment {
        Environment::Development => {
            tracing::warn!("No database configured; using the in-memory store (data is lost on restart)");
            Ok(Arc::new(MemoryStore::new()))
        }
        env => bail!("DATABASE_URL is required in {:?} mode", env),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
