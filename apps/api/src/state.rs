use std::sync::Arc;

use crate::analysis::market_scorer::MarketScorer;
use crate::analysis::store::AnalysisStore;
use crate::config::Config;
use crate::llm_client::ModelProvider;
use crate::payments::PaymentProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres in production; in-memory when no DATABASE_URL is configured.
    pub store: Arc<dyn AnalysisStore>,
    /// Resolved once at startup. Offline means every model call takes the template path.
    pub llm: ModelProvider,
    pub market_scorer: Arc<dyn MarketScorer>,
    pub payments: Arc<dyn PaymentProvider>,
    pub config: Config,
}
