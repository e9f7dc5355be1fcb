// Resume analysis: parsing, market scoring, report generation and the paywall lifecycle.
// All model calls go through llm_client.

pub mod handlers;
pub mod lifecycle;
pub mod market_scorer;
pub mod models;
pub mod prompts;
pub mod report_generator;
pub mod resume_parser;
pub mod store;
pub mod templates;
