mod api_doc;
mod app;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod state;
mod store;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::app::app;
use crate::config::{Config, Mode};
use crate::state::AppState;
use crate::store::MongoKvStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    let default_filter = match config.mode {
        Mode::Development => "debug",
        Mode::Production => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!("kvpair-api starting");
    config.log_startup();

    // A store whose database is unreachable still serves requests; each
    // operation fails on its own against the unusable connection.
    let store = MongoKvStore::connect(&config.connection_string).await?;

    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config.clone()),
    };

    let addr = format!("{}:{}", config.service_host, config.service_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("server started on {} ({})", addr, config.mode);

    axum::serve(listener, app(state))
        .await
        .context("server error")?;

    Ok(())
}
