//! Analysis persistence.
//!
//! `PgAnalysisStore` is the production store. `MemoryAnalysisStore` backs local runs
//! without `DATABASE_URL` and the router tests. The only mutation after insert is
//! `mark_paid_with_report`, which can set `is_paid` to true and never back to false.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::{MarketScore, ParsedResume, StrategyReport};
use crate::errors::AppError;
use crate::models::analysis::{Analysis, AnalysisRow};

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Inserts a new unpaid analysis and returns the stored record.
    async fn create(
        &self,
        parsed_resume: &ParsedResume,
        market_score: &MarketScore,
    ) -> Result<Analysis, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Analysis>, AppError>;

    /// Attaches the report and flips `is_paid` in a single update.
    /// Returns false when no record with `id` exists.
    async fn mark_paid_with_report(
        &self,
        id: Uuid,
        report: &StrategyReport,
    ) -> Result<bool, AppError>;

    /// "postgres" | "memory" — for logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn create(
        &self,
        parsed_resume: &ParsedResume,
        market_score: &MarketScore,
    ) -> Result<Analysis, AppError> {
        let row = sqlx::query_as::<_, AnalysisRow>(
            r#"
            INSERT INTO analyses (id, parsed_resume, market_score, is_paid, created_at)
            VALUES ($1, $2, $3, FALSE, $4)
            RETURNING id, parsed_resume, market_score, report, is_paid, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(Json(parsed_resume))
        .bind(Json(market_score))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        info!("Analysis {} stored", row.id);
        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Analysis>, AppError> {
        let row = sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT id, parsed_resume, market_score, report, is_paid, created_at
            FROM analyses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Analysis::from))
    }

    async fn mark_paid_with_report(
        &self,
        id: Uuid,
        report: &StrategyReport,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE analyses
            SET report = $2, is_paid = TRUE
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(report))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryAnalysisStore {
    records: RwLock<HashMap<Uuid, Analysis>>,
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn create(
        &self,
        parsed_resume: &ParsedResume,
        market_score: &MarketScore,
    ) -> Result<Analysis, AppError> {
        let analysis = Analysis {
            id: Uuid::new_v4(),
            parsed_resume: parsed_resume.clone(),
            market_score: *market_score,
            report: None,
            is_paid: false,
            created_at: Utc::now(),
        };
        self.records
            .write()
            .await
            .insert(analysis.id, analysis.clone());
        Ok(analysis)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Analysis>, AppError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn mark_paid_with_report(
        &self,
        id: Uuid,
        report: &StrategyReport,
    ) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(analysis) => {
                analysis.report = Some(report.clone());
                analysis.is_paid = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
