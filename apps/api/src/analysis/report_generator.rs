//! Report Generator — produces the full eight-section `StrategyReport`.
//!
//! Two tiers: the model generates the report; on any failure (no credential, network
//! error, malformed JSON) the archetype template is used instead. Both tiers return the
//! same type, so callers never see a failure from this module.
//!
//! Template scoring:
//!   composite = min(50 + min(years × 5, 30) + min(stack × 2, 15), 98)
//!   australia = composite − 5 for the default archetype
//!   korea     = composite + 2 for the backend archetype

use tracing::{info, warn};

use crate::analysis::models::{
    clamp_score, ExperienceLevel, Level, MarketAlignment, MarketScore, ParsedResume,
    PortfolioSignal, PositionDiagnosis, StrategyReport,
};
use crate::analysis::prompts::{REPORT_PROMPT_TEMPLATE, REPORT_ROLE};
use crate::analysis::templates::{Archetype, DiagnosisTemplate, NAME_PLACEHOLDER};
use crate::llm_client::prompts::{fill_template, json_system, LOCALE_INSTRUCTION};
use crate::llm_client::{CompletionRequest, LlmError, ModelProvider};

const REPORT_TEMPERATURE: f32 = 0.5;

const BASE_SCORE: f64 = 50.0;
const MAX_EXPERIENCE_POINTS: f64 = 30.0;
const MAX_STACK_POINTS: f64 = 15.0;
const MAX_COMPOSITE: f64 = 98.0;
const AUSTRALIA_GENERALIST_PENALTY: u32 = 5;
const KOREA_BACKEND_BONUS: u32 = 2;

/// Generates the strategy report. Always terminates with a well-formed report.
pub async fn generate_report(
    resume: &ParsedResume,
    market_score: Option<&MarketScore>,
    llm: &ModelProvider,
) -> StrategyReport {
    if llm.is_offline() {
        info!("No model credential configured — using template report");
        return template_report(resume);
    }

    match request_report(resume, market_score, llm).await {
        Ok(report) => {
            info!(
                "Strategy report generated: au={}, kr={}, risks={}",
                report.diagnosis.market_alignment.australia,
                report.diagnosis.market_alignment.korea,
                report.risk_map.len()
            );
            report
        }
        Err(e) => {
            warn!("Report generation failed, using template report: {e}");
            template_report(resume)
        }
    }
}

async fn request_report(
    resume: &ParsedResume,
    market_score: Option<&MarketScore>,
    llm: &ModelProvider,
) -> Result<StrategyReport, LlmError> {
    let prompt = build_report_prompt(resume, market_score);
    let system = json_system(REPORT_ROLE);

    let mut report: StrategyReport = llm
        .request_json(&CompletionRequest {
            system: &system,
            prompt: &prompt,
            temperature: REPORT_TEMPERATURE,
        })
        .await?;

    // Colors are derived from severity, whatever the model wrote.
    for item in &mut report.risk_map {
        item.color = item.severity.color();
    }

    Ok(report)
}

fn build_report_prompt(resume: &ParsedResume, market_score: Option<&MarketScore>) -> String {
    let project_summary = if resume.projects.is_empty() {
        "none listed".to_string()
    } else {
        resume
            .projects
            .iter()
            .map(|p| format!("{} ({:?}; {})", p.name, p.complexity, p.technologies.join(", ")))
            .collect::<Vec<_>>()
            .join("; ")
    };

    let market_scores = match market_score {
        Some(score) => format!(
            "- Australia: {}/100\n- Korea: {}/100\nGround marketAlignment in these scores.",
            score.australia_score, score.korea_score
        ),
        None => "Not yet computed — estimate marketAlignment yourself.".to_string(),
    };

    fill_template(
        REPORT_PROMPT_TEMPLATE,
        &[
            ("locale_instruction", LOCALE_INSTRUCTION),
            ("name", resume.display_name()),
            ("job_title", resume.job_title.as_deref().unwrap_or("unknown")),
            ("tech_stack", resume.tech_stack.join(", ").as_str()),
            ("years", resume.years_of_experience.to_string().as_str()),
            ("industry", resume.industry.as_str()),
            (
                "seniority",
                format!("{:?}", resume.seniority_level)
                    .to_lowercase()
                    .as_str(),
            ),
            ("project_summary", project_summary.as_str()),
            ("market_scores", market_scores.as_str()),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Template fallback
// ────────────────────────────────────────────────────────────────────────────

/// Builds the deterministic report: archetype template + computed diagnosis.
pub fn template_report(resume: &ParsedResume) -> StrategyReport {
    let archetype = Archetype::detect(&resume.tech_stack, resume.job_title.as_deref());
    let template = archetype.template();
    let diagnosis = diagnose(resume, archetype, &template.diagnosis);
    template.into_report(diagnosis)
}

/// Composite template score, 50 ≤ score ≤ 98, non-decreasing in both inputs.
pub fn composite_score(years: f64, stack_len: usize) -> u32 {
    let years = if years.is_finite() { years.max(0.0) } else { 0.0 };
    let experience = (years * 5.0).min(MAX_EXPERIENCE_POINTS);
    let stack = (stack_len as f64 * 2.0).min(MAX_STACK_POINTS);
    clamp_score((BASE_SCORE + experience + stack).min(MAX_COMPOSITE))
}

fn diagnose(
    resume: &ParsedResume,
    archetype: Archetype,
    template: &DiagnosisTemplate,
) -> PositionDiagnosis {
    let years = resume.years_of_experience;
    let composite = composite_score(years, resume.tech_stack.len());

    let australia = match archetype {
        Archetype::Default => composite.saturating_sub(AUSTRALIA_GENERALIST_PENALTY),
        Archetype::Frontend | Archetype::Backend => composite,
    };
    let korea = match archetype {
        Archetype::Backend => composite + KOREA_BACKEND_BONUS,
        Archetype::Frontend | Archetype::Default => composite,
    };

    PositionDiagnosis {
        experience_level: ExperienceLevel::from_years(years),
        tech_stack: template.tech_stack.clone(),
        market_alignment: MarketAlignment {
            australia: australia.min(100),
            korea: korea.min(100),
        },
        visa_risk: template.visa_risk,
        language_risk: Level::Medium,
        portfolio_signal: if years > 3.0 {
            PortfolioSignal::Strong
        } else {
            PortfolioSignal::Moderate
        },
        summary: template
            .summary
            .replace(NAME_PLACEHOLDER, resume.display_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{RiskColor, SeniorityLevel};
    use crate::llm_client::testing::StaticBackend;

    fn resume(stack: &[&str], years: f64, name: Option<&str>) -> ParsedResume {
        ParsedResume {
            name: name.map(str::to_string),
            job_title: None,
            summary: None,
            tech_stack: stack.iter().map(|s| s.to_string()).collect(),
            years_of_experience: years,
            industry: "Software".to_string(),
            seniority_level: SeniorityLevel::Mid,
            projects: vec![],
            raw_text: "raw".to_string(),
        }
    }

    #[test]
    fn test_composite_bounds() {
        assert_eq!(composite_score(0.0, 0), 50);
        assert_eq!(composite_score(100.0, 100), 98);
        assert_eq!(composite_score(-3.0, 0), 50);
    }

    #[test]
    fn test_composite_is_monotonic_in_years_and_stack() {
        for stack in 0..20 {
            let mut previous = 0;
            for half_years in 0..40 {
                let score = composite_score(half_years as f64 / 2.0, stack);
                assert!(score >= previous, "years not monotonic at stack={stack}");
                assert!((50..=98).contains(&score));
                previous = score;
            }
        }
        for years in 0..15 {
            let mut previous = 0;
            for stack in 0..20 {
                let score = composite_score(years as f64, stack);
                assert!(score >= previous, "stack not monotonic at years={years}");
                previous = score;
            }
        }
    }

    #[test]
    fn test_composite_example() {
        // 50 + min(25, 30) + min(6, 15) = 81
        assert_eq!(composite_score(5.0, 3), 81);
    }

    #[test]
    fn test_frontend_template_diagnosis() {
        let report = template_report(&resume(&["React", "Node.js", "AWS"], 5.0, Some("Ji-woo")));
        let diagnosis = &report.diagnosis;
        assert_eq!(diagnosis.market_alignment.australia, 81);
        assert_eq!(diagnosis.market_alignment.korea, 81);
        assert_eq!(diagnosis.experience_level, ExperienceLevel::Mid);
        assert_eq!(diagnosis.portfolio_signal, PortfolioSignal::Strong);
        assert_eq!(diagnosis.language_risk, Level::Medium);
        assert!(diagnosis.summary.starts_with("Ji-woo님은"));
        assert!(!diagnosis.summary.contains(NAME_PLACEHOLDER));
        assert_eq!(report.company_fit.australia[0].name, "Canva");
    }

    #[test]
    fn test_backend_gets_korea_bonus() {
        let report = template_report(&resume(&["Java", "Spring"], 2.0, None));
        assert_eq!(report.diagnosis.market_alignment.australia, 64);
        assert_eq!(report.diagnosis.market_alignment.korea, 66);
        assert_eq!(report.diagnosis.visa_risk, Level::Low);
        assert_eq!(report.diagnosis.portfolio_signal, PortfolioSignal::Moderate);
        assert!(report.diagnosis.summary.starts_with("지원자님은"));
    }

    #[test]
    fn test_default_gets_australia_penalty() {
        let report = template_report(&resume(&[], 0.0, None));
        assert_eq!(report.diagnosis.market_alignment.australia, 45);
        assert_eq!(report.diagnosis.market_alignment.korea, 50);
        assert_eq!(report.diagnosis.experience_level, ExperienceLevel::Junior);
    }

    #[test]
    fn test_senior_backend_stays_within_range() {
        let report = template_report(&resume(&["SQL"; 20], 30.0, None));
        assert_eq!(report.diagnosis.market_alignment.korea, 100);
        assert_eq!(report.diagnosis.experience_level, ExperienceLevel::Senior);
    }

    #[tokio::test]
    async fn test_offline_uses_template() {
        let candidate = resume(&["Vue"], 1.0, Some("Alex"));
        let report = generate_report(&candidate, None, &ModelProvider::Offline).await;
        assert_eq!(report, template_report(&candidate));
    }

    #[tokio::test]
    async fn test_model_report_is_used_and_colors_follow_severity() {
        let candidate = resume(&["Go"], 6.0, Some("Sam"));
        let mut expected = template_report(&resume(&["React"], 9.0, Some("Model")));
        expected.diagnosis.summary = "model-written summary".to_string();
        expected.risk_map[0].color = RiskColor::Green;
        let reply = serde_json::to_string(&expected).unwrap();
        let (provider, backend) = StaticBackend::provider(reply);

        let report = generate_report(&candidate, None, &provider).await;
        assert_eq!(backend.call_count(), 1);
        assert_eq!(report.diagnosis.summary, "model-written summary");
        for item in &report.risk_map {
            assert_eq!(item.color, item.severity.color());
        }
    }

    #[tokio::test]
    async fn test_malformed_model_report_falls_back_to_template() {
        let candidate = resume(&["Spring"], 4.0, None);
        let (provider, _) = StaticBackend::provider(r#"{"diagnosis": {}}"#);
        let report = generate_report(&candidate, None, &provider).await;
        assert_eq!(report, template_report(&candidate));
    }

    #[test]
    fn test_prompt_embeds_candidate_and_scores() {
        let candidate = resume(&["Kotlin", "Spring"], 7.0, Some("Dana"));
        let score = MarketScore::from_report(&template_report(&candidate));
        let prompt = build_report_prompt(&candidate, Some(&score));
        assert!(prompt.contains("Dana"));
        assert!(prompt.contains("Kotlin, Spring"));
        assert!(prompt.contains(&format!("Australia: {}/100", score.australia_score)));
        assert!(prompt.contains("Korean"));
        assert!(!prompt.contains("{market_scores}"));
    }

    #[test]
    fn test_prompt_keeps_placeholder_text_in_candidate_fields() {
        let mut candidate = resume(&["{years}"], 3.0, Some("{market_scores}"));
        candidate.industry = "{name}".to_string();
        let score = MarketScore::from_report(&template_report(&candidate));
        let prompt = build_report_prompt(&candidate, Some(&score));

        assert!(prompt.contains("- Name: {market_scores}"));
        assert!(prompt.contains("- Tech Stack: {years}"));
        assert!(prompt.contains("- Industry: {name}"));
        assert!(prompt.contains("- Years of Experience: 3"));
    }
}
