use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::models::{MarketScore, ParsedResume, StrategyReport};

/// The persisted aggregate tying one resume submission to its scores, report and
/// payment state. Written once, then patched exactly once (report + is_paid).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: Uuid,
    pub parsed_resume: ParsedResume,
    pub market_score: MarketScore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<StrategyReport>,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

/// Row shape of the `analyses` table; JSON documents live in JSONB columns.
#[derive(Debug, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub parsed_resume: Json<ParsedResume>,
    pub market_score: Json<MarketScore>,
    pub report: Option<Json<StrategyReport>>,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AnalysisRow> for Analysis {
    fn from(row: AnalysisRow) -> Self {
        Analysis {
            id: row.id,
            parsed_resume: row.parsed_resume.0,
            market_score: row.market_score.0,
            report: row.report.map(|r| r.0),
            is_paid: row.is_paid,
            created_at: row.created_at,
        }
    }
}
