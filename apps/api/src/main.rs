mod analysis;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod payments;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::market_scorer::scorer_for;
use crate::analysis::store::{AnalysisStore, MemoryAnalysisStore, PgAnalysisStore};
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::ModelProvider;
use crate::payments::StripeClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerMap API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage
    let store: Arc<dyn AnalysisStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgAnalysisStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set — analyses are kept in memory and lost on restart");
            Arc::new(MemoryAnalysisStore::new())
        }
    };
    info!("Analysis store: {}", store.backend());

    // Initialize model provider (offline when the key is absent or a placeholder)
    let llm = ModelProvider::from_api_key(config.openai_api_key.as_deref(), config.llm_timeout)?;
    info!(
        "Model provider: {} (model: {})",
        llm.label(),
        llm_client::MODEL
    );

    let market_scorer = scorer_for(&llm);
    info!("Market scorer: {}", market_scorer.backend());

    let payments = Arc::new(StripeClient::new(
        config.stripe_secret_key.clone(),
        config.request_timeout(),
    )?);

    // Build app state
    let state = AppState {
        store,
        llm,
        market_scorer,
        payments,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the frontend origin once it is configurable

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
