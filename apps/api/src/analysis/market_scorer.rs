//! Market Scoring — pluggable, trait-based scorer for Australia/Korea market fit.
//!
//! `LlmMarketScorer` asks the model and fails hard on a bad answer.
//! `TemplateMarketScorer` derives the score from the template report and is only
//! selected when no model credential is configured.
//!
//! `AppState` holds an `Arc<dyn MarketScorer>`, chosen once at startup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::analysis::models::{MarketScore, ParsedResume};
use crate::analysis::prompts::{MARKET_SCORE_PROMPT_TEMPLATE, MARKET_SCORE_ROLE};
use crate::analysis::report_generator::template_report;
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, json_system};
use crate::llm_client::{CompletionRequest, ModelProvider};

const SCORE_TEMPERATURE: f32 = 0.4;

/// The market scorer trait. Implement this to swap backends without touching
/// the handler or caller code.
#[async_trait]
pub trait MarketScorer: Send + Sync {
    async fn score(&self, resume: &ParsedResume) -> Result<MarketScore, AppError>;

    /// "llm" | "template" — for logs.
    fn backend(&self) -> &'static str;
}

/// Picks the scorer matching the startup model provider.
pub fn scorer_for(llm: &ModelProvider) -> Arc<dyn MarketScorer> {
    match llm {
        ModelProvider::Remote(_) => Arc::new(LlmMarketScorer(llm.clone())),
        ModelProvider::Offline => Arc::new(TemplateMarketScorer),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmMarketScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmMarketScorer(pub ModelProvider);

#[async_trait]
impl MarketScorer for LlmMarketScorer {
    async fn score(&self, resume: &ParsedResume) -> Result<MarketScore, AppError> {
        let prompt = build_score_prompt(resume);
        let system = json_system(MARKET_SCORE_ROLE);

        let score: MarketScore = self
            .0
            .request_json(&CompletionRequest {
                system: &system,
                prompt: &prompt,
                temperature: SCORE_TEMPERATURE,
            })
            .await
            .map_err(|e| AppError::Llm(format!("Market scoring failed: {e}")))?;

        info!(
            "Market score: au={}, kr={}",
            score.australia_score, score.korea_score
        );
        Ok(score)
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

fn build_score_prompt(resume: &ParsedResume) -> String {
    fill_template(
        MARKET_SCORE_PROMPT_TEMPLATE,
        &[
            ("tech_stack", resume.tech_stack.join(", ").as_str()),
            ("years", resume.years_of_experience.to_string().as_str()),
            ("industry", resume.industry.as_str()),
            (
                "seniority",
                format!("{:?}", resume.seniority_level)
                    .to_lowercase()
                    .as_str(),
            ),
            ("project_count", resume.projects.len().to_string().as_str()),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// TemplateMarketScorer
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic scorer backed by the template report. No network call.
pub struct TemplateMarketScorer;

#[async_trait]
impl MarketScorer for TemplateMarketScorer {
    async fn score(&self, resume: &ParsedResume) -> Result<MarketScore, AppError> {
        Ok(MarketScore::from_report(&template_report(resume)))
    }

    fn backend(&self) -> &'static str {
        "template"
    }
}
