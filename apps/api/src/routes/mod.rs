pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::extraction::handlers as extraction;
use crate::payments::handlers as payments;
use crate::state::AppState;

/// Upload cap for `/extract-text`; resumes above this are rejected with 413.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis
        .route("/analyze", post(analysis::handle_analyze))
        .route("/analysis/:id", get(analysis::handle_get_analysis))
        // Upload
        .route(
            "/extract-text",
            post(extraction::handle_extract_text).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Paywall
        .route("/checkout", post(payments::handle_checkout))
        .route("/webhook", post(payments::handle_webhook))
        .with_state(state)
}
