mod completion;
mod config;
mod enrichment;
mod error;
mod models;
mod openai;
mod pdf;
mod routes;
#[cfg(test)]
mod test_support;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    completion::{CompletionClient, DemoClient},
    config::Config,
    enrichment::Enricher,
    openai::OpenAiClient,
    routes::{router, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    let client: Arc<dyn CompletionClient> = match config.api_key.clone() {
        Some(key) => Arc::new(OpenAiClient::new(key, &config)?),
        None => Arc::new(DemoClient),
    };
    if config.demo_mode() {
        tracing::warn!("OPENAI_API_KEY not set, running in demo mode - listings are not AI-enriched");
    }

    let enricher = Enricher::new(client, config.temperature, config.max_tokens);
    tracing::info!(client = enricher.client_name(), max_tokens = config.max_tokens, "Enrichment ready");
    let app = router(AppState { enricher: Arc::new(enricher) });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
