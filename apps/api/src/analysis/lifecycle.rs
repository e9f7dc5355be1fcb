//! Paywall lifecycle of an analysis.
//!
//!   Created ──(payment confirmed, report generated and stored)──▶ Complete
//!
//! Report generation happens inside `complete_paid_analysis` before anything is
//! written, so a stored record is either unpaid without a report or paid with one.

use tracing::info;
use uuid::Uuid;

use crate::analysis::report_generator::generate_report;
use crate::analysis::store::AnalysisStore;
use crate::errors::AppError;
use crate::llm_client::ModelProvider;
use crate::models::analysis::Analysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Created,
    Complete,
}

impl AnalysisStage {
    /// Stage of a stored record.
    pub fn of(analysis: &Analysis) -> Self {
        if analysis.is_paid {
            AnalysisStage::Complete
        } else {
            AnalysisStage::Created
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaidOutcome {
    /// The report was generated and stored in this call.
    Completed,
    /// The analysis was already paid; nothing was changed.
    AlreadyComplete,
}

/// Runs the Created → Complete transition after a confirmed payment.
///
/// Redelivered payment events are acknowledged without regenerating the report.
pub async fn complete_paid_analysis(
    store: &dyn AnalysisStore,
    llm: &ModelProvider,
    id: Uuid,
) -> Result<PaidOutcome, AppError> {
    let analysis = store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;

    if AnalysisStage::of(&analysis) == AnalysisStage::Complete {
        info!("Analysis {id} already paid, skipping report generation");
        return Ok(PaidOutcome::AlreadyComplete);
    }

    info!("Analysis {id} paid, generating report");
    let report = generate_report(
        &analysis.parsed_resume,
        Some(&analysis.market_score),
        llm,
    )
    .await;

    if !store.mark_paid_with_report(id, &report).await? {
        return Err(AppError::NotFound(format!("Analysis {id} not found")));
    }

    info!("Analysis {id}: {:?}", AnalysisStage::Complete);
    Ok(PaidOutcome::Completed)
}
