use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::{
    Currency, MarketScore, ParsedResume, SalaryRange, SkillGap, StrategyReport,
};
use crate::analysis::resume_parser::parse_resume;
use crate::errors::AppError;
use crate::models::analysis::Analysis;
use crate::state::AppState;

/// Minimum trimmed resume length accepted by `POST /analyze`.
pub const MIN_RESUME_CHARS: usize = 50;

const DEFAULT_CANDIDATE_NAME: &str = "Candidate";
const DEFAULT_JOB_TITLE: &str = "Tech Professional";
const DEFAULT_SUMMARY: &str = "A detailed analysis of your profile.";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub id: Uuid,
    pub parsed_resume: ParsedResume,
    pub market_score: MarketScore,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

/// POST /analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if req.resume_text.trim().chars().count() < MIN_RESUME_CHARS {
        return Err(AppError::Validation(
            "Resume text is too short or empty".to_string(),
        ));
    }

    let parsed_resume = parse_resume(&req.resume_text, &state.llm).await;
    let market_score = state.market_scorer.score(&parsed_resume).await?;
    let analysis = state.store.create(&parsed_resume, &market_score).await?;

    info!(
        "Analysis {} created (scorer={}, au={}, kr={})",
        analysis.id,
        state.market_scorer.backend(),
        market_score.australia_score,
        market_score.korea_score
    );

    Ok(Json(AnalyzeResponse {
        id: analysis.id,
        parsed_resume: analysis.parsed_resume,
        market_score: analysis.market_score,
        is_paid: analysis.is_paid,
        created_at: analysis.created_at,
    }))
}

/// GET /analysis/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisView>, AppError> {
    let not_found = || AppError::NotFound("Analysis not found".to_string());
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let analysis = state.store.get(id).await?.ok_or_else(not_found)?;
    Ok(Json(AnalysisView::from(analysis)))
}

// ────────────────────────────────────────────────────────────────────────────
// Results-page projection
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CountrySalary {
    pub currency: Currency,
    pub min: u64,
    pub max: u64,
    pub median: u64,
}

impl From<SalaryRange> for CountrySalary {
    fn from(range: SalaryRange) -> Self {
        CountrySalary {
            currency: range.currency,
            min: range.min,
            max: range.max,
            median: range.median(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SalaryView {
    pub au: CountrySalary,
    pub kr: CountrySalary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryFit {
    pub score: u32,
    pub top_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MarketFitView {
    pub au: CountryFit,
    pub kr: CountryFit,
}

#[derive(Debug, Serialize)]
pub struct ActionItem {
    pub priority: &'static str,
    pub task: String,
    pub deadline: String,
}

/// The UI-shaped view of a stored analysis.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    pub id: Uuid,
    pub candidate_name: String,
    pub job_title: String,
    pub total_score: u32,
    pub summary: String,
    pub salary: SalaryView,
    pub market_fit: MarketFitView,
    pub action_plan: Vec<ActionItem>,
    pub parsed_resume: ParsedResume,
    pub market_score: MarketScore,
    pub report: Option<StrategyReport>,
    pub is_paid: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Analysis> for AnalysisView {
    fn from(analysis: Analysis) -> Self {
        let resume = &analysis.parsed_resume;
        let score = &analysis.market_score;
        let report = analysis.report.as_ref();

        let salary = match report {
            Some(r) => SalaryView {
                au: r.market_comparison.salary.australia.into(),
                kr: r.market_comparison.salary.korea.into(),
            },
            None => default_salary(),
        };

        let market_fit = MarketFitView {
            au: CountryFit {
                score: score.australia_score,
                top_skills: resume.tech_stack.clone(),
                missing_skills: missing_skills(report.map(|r| &r.skill_gap.australia)),
            },
            kr: CountryFit {
                score: score.korea_score,
                top_skills: resume.tech_stack.clone(),
                missing_skills: missing_skills(report.map(|r| &r.skill_gap.korea)),
            },
        };

        AnalysisView {
            id: analysis.id,
            candidate_name: non_blank(resume.name.as_deref())
                .unwrap_or(DEFAULT_CANDIDATE_NAME)
                .to_string(),
            job_title: non_blank(resume.job_title.as_deref())
                .unwrap_or(DEFAULT_JOB_TITLE)
                .to_string(),
            total_score: score.total_score(),
            summary: non_blank(resume.summary.as_deref())
                .unwrap_or(DEFAULT_SUMMARY)
                .to_string(),
            salary,
            market_fit,
            action_plan: action_plan(report),
            parsed_resume: analysis.parsed_resume.clone(),
            market_score: analysis.market_score,
            is_paid: analysis.is_paid,
            created_at: analysis.created_at,
            report: analysis.report,
        }
    }
}

fn missing_skills(gap: Option<&SkillGap>) -> Vec<String> {
    gap.map(|g| g.missing_skills.clone()).unwrap_or_default()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_salary() -> SalaryView {
    SalaryView {
        au: CountrySalary {
            currency: Currency::Aud,
            min: 85_000,
            max: 130_000,
            median: 105_000,
        },
        kr: CountrySalary {
            currency: Currency::Krw,
            min: 45_000_000,
            max: 80_000_000,
            median: 60_000_000,
        },
    }
}

/// First step of each month from the paid report; a generic plan before payment.
fn action_plan(report: Option<&StrategyReport>) -> Vec<ActionItem> {
    let Some(report) = report else {
        return vec![
            ActionItem {
                priority: "High",
                task: "Update LinkedIn profile for AU market".to_string(),
                deadline: "Day 3".to_string(),
            },
            ActionItem {
                priority: "Medium",
                task: "Learn React Server Components".to_string(),
                deadline: "Day 14".to_string(),
            },
            ActionItem {
                priority: "High",
                task: "Apply to Global Talent Visa".to_string(),
                deadline: "Day 30".to_string(),
            },
        ];
    };

    let plan = &report.execution_plan;
    [(&plan.month1, "High", 1), (&plan.month2, "Medium", 2), (&plan.month3, "Medium", 3)]
        .into_iter()
        .filter_map(|(month, priority, index)| {
            month.steps.first().map(|step| ActionItem {
                priority,
                task: step.task.clone(),
                deadline: format!("Month {index}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::report_generator::template_report;
    use crate::analysis::resume_parser::fallback_resume;

    fn analysis(report: bool) -> Analysis {
        let mut resume = fallback_resume("raw");
        resume.name = None;
        resume.job_title = Some("  ".to_string());
        let generated = template_report(&resume);
        Analysis {
            id: Uuid::new_v4(),
            market_score: MarketScore::from_report(&generated),
            parsed_resume: resume,
            report: report.then_some(generated),
            is_paid: report,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unpaid_projection_uses_defaults() {
        let view = AnalysisView::from(analysis(false));
        assert_eq!(view.candidate_name, "Candidate");
        assert_eq!(view.job_title, "Tech Professional");
        assert_eq!(view.salary.au.median, 105_000);
        assert_eq!(view.salary.kr.currency, Currency::Krw);
        assert!(view.market_fit.au.missing_skills.is_empty());
        assert_eq!(view.market_fit.au.top_skills, view.parsed_resume.tech_stack);
        assert_eq!(view.action_plan.len(), 3);
    }

    #[test]
    fn test_total_score_is_rounded_mean() {
        let mut record = analysis(false);
        record.market_score.australia_score = 70;
        record.market_score.korea_score = 75;
        let view = AnalysisView::from(record);
        assert_eq!(view.total_score, 73);
    }

    #[test]
    fn test_paid_projection_reads_report() {
        let record = analysis(true);
        let report = record.report.clone().unwrap();
        let view = AnalysisView::from(record);

        assert_eq!(
            view.salary.au.min,
            report.market_comparison.salary.australia.min
        );
        assert_eq!(
            view.market_fit.kr.missing_skills,
            report.skill_gap.korea.missing_skills
        );
        assert_eq!(
            view.action_plan[0].task,
            report.execution_plan.month1.steps[0].task
        );
    }

    #[test]
    fn test_projection_serializes_camel_case() {
        let value = serde_json::to_value(AnalysisView::from(analysis(false))).unwrap();
        assert!(value.get("candidateName").is_some());
        assert!(value.get("totalScore").is_some());
        assert!(value["marketFit"]["au"].get("topSkills").is_some());
        assert_eq!(value["salary"]["au"]["currency"], "AUD");
        assert_eq!(value["isPaid"], false);
        assert!(value["report"].is_null());
    }
}
