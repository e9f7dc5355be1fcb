//! Shared data model for the analysis pipeline.
//!
//! Everything here crosses the wire as camelCase JSON: model output is parsed into
//! these types, and the same shapes are persisted and returned to the client.

use serde::{Deserialize, Deserializer, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Score helpers
// ────────────────────────────────────────────────────────────────────────────

/// Clamps any numeric value into the 0–100 score range.
pub fn clamp_score(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}

/// Accepts any JSON number (models sometimes emit `87.5`) and clamps it to 0–100.
fn de_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_score(raw))
}

// ────────────────────────────────────────────────────────────────────────────
// ParsedResume
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeniorityLevel {
    Junior,
    #[default]
    Mid,
    Senior,
    Lead,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    pub name: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub description: String,
}

/// Candidate facts extracted from free resume text. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub years_of_experience: f64,
    #[serde(default)]
    pub industry: String,
    pub seniority_level: SeniorityLevel,
    #[serde(default)]
    pub projects: Vec<ProjectAnalysis>,
    /// Always the verbatim input text, whatever the model returned here.
    #[serde(default)]
    pub raw_text: String,
}

impl ParsedResume {
    /// Attaches the original input and repairs values the model may get wrong.
    pub fn with_raw_text(mut self, raw_text: &str) -> Self {
        self.raw_text = raw_text.to_string();
        if !self.years_of_experience.is_finite() || self.years_of_experience < 0.0 {
            self.years_of_experience = 0.0;
        }
        self
    }

    /// Name to address the candidate with in generated text.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("지원자")
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MarketScore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketFactors {
    #[serde(deserialize_with = "de_score")]
    pub market_demand: u32,
    /// Higher = stronger English proficiency needed.
    #[serde(deserialize_with = "de_score")]
    pub english_requirement: u32,
    /// Higher = harder to obtain a work visa.
    #[serde(deserialize_with = "de_score")]
    pub visa_difficulty: u32,
    #[serde(deserialize_with = "de_score")]
    pub competition_level: u32,
    #[serde(deserialize_with = "de_score")]
    pub salary_fit: u32,
}

/// Per-country fit scores plus the factor breakdown behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketScore {
    #[serde(deserialize_with = "de_score")]
    pub australia_score: u32,
    #[serde(deserialize_with = "de_score")]
    pub korea_score: u32,
    pub factors: MarketFactors,
}

impl MarketScore {
    /// Back-fills a score from a report when the report is the primary artifact.
    pub fn from_report(report: &StrategyReport) -> Self {
        let alignment = &report.diagnosis.market_alignment;
        let comparison = &report.market_comparison;

        MarketScore {
            australia_score: alignment.australia,
            korea_score: alignment.korea,
            factors: MarketFactors {
                market_demand: mean(alignment.australia, alignment.korea),
                english_requirement: report.diagnosis.language_risk.weight(),
                visa_difficulty: comparison.visa_barrier.weight(),
                competition_level: mean(
                    comparison.competition.australia.weight(),
                    comparison.competition.korea.weight(),
                ),
                salary_fit: report.diagnosis.experience_level.salary_fit(),
            },
        }
    }

    /// Headline score shown to the user: the rounded mean of both countries.
    pub fn total_score(&self) -> u32 {
        mean(self.australia_score, self.korea_score)
    }
}

fn mean(a: u32, b: u32) -> u32 {
    clamp_score((a as f64 + b as f64) / 2.0)
}

// ────────────────────────────────────────────────────────────────────────────
// StrategyReport enums
// ────────────────────────────────────────────────────────────────────────────

/// Shared Low/Medium/High scale used by risk, competition, visa and balance fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    /// Position of the level on a 0–100 factor scale.
    pub fn weight(self) -> u32 {
        match self {
            Level::Low => 30,
            Level::Medium => 60,
            Level::High => 85,
        }
    }

    pub fn color(self) -> RiskColor {
        match self {
            Level::Low => RiskColor::Green,
            Level::Medium => RiskColor::Yellow,
            Level::High => RiskColor::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskColor {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
    Lead,
}

impl ExperienceLevel {
    /// Experience tier from years: >7 Senior, >3 Mid, otherwise Junior.
    pub fn from_years(years: f64) -> Self {
        if years > 7.0 {
            ExperienceLevel::Senior
        } else if years > 3.0 {
            ExperienceLevel::Mid
        } else {
            ExperienceLevel::Junior
        }
    }

    fn salary_fit(self) -> u32 {
        match self {
            ExperienceLevel::Junior => 55,
            ExperienceLevel::Mid => 70,
            ExperienceLevel::Senior => 85,
            ExperienceLevel::Lead => 90,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortfolioSignal {
    Weak,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Market {
    Australia,
    Korea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Aud,
    Krw,
}

// ────────────────────────────────────────────────────────────────────────────
// StrategyReport sections
// ────────────────────────────────────────────────────────────────────────────

/// A value per target country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByCountry<T> {
    pub australia: T,
    pub korea: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechStackProfile {
    pub depth: String,
    pub breadth: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketAlignment {
    #[serde(deserialize_with = "de_score")]
    pub australia: u32,
    #[serde(deserialize_with = "de_score")]
    pub korea: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDiagnosis {
    pub experience_level: ExperienceLevel,
    pub tech_stack: TechStackProfile,
    pub market_alignment: MarketAlignment,
    pub visa_risk: Level,
    pub language_risk: Level,
    pub portfolio_signal: PortfolioSignal,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u64,
    pub max: u64,
    pub currency: Currency,
}

impl SalaryRange {
    pub fn median(&self) -> u64 {
        self.min + (self.max.saturating_sub(self.min)) / 2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketComparison {
    pub salary: ByCountry<SalaryRange>,
    pub trends: ByCountry<Vec<String>>,
    pub competition: ByCountry<Level>,
    pub visa_barrier: Level,
    pub work_life_balance: ByCountry<Level>,
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    pub category: String,
    pub risk: String,
    pub severity: Level,
    pub color: RiskColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub market: Market,
    pub missing_skills: Vec<String>,
    pub roadmap: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryResumeStrategy {
    pub focus: Vec<String>,
    pub checklist: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthPlan {
    pub focus: String,
    pub steps: Vec<ExecutionStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub month1: MonthPlan,
    pub month2: MonthPlan,
    pub month3: MonthPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecommendation {
    pub name: String,
    pub reason: String,
    #[serde(deserialize_with = "de_score")]
    pub match_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyFit {
    pub australia: Vec<CompanyRecommendation>,
    pub korea: Vec<CompanyRecommendation>,
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaStatus {
    pub visa_type: String,
    pub risk_level: Level,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisaPathway {
    pub subclass: String,
    pub name: String,
    pub eligibility: Level,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub strategy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaAnalysis {
    pub current_status: VisaStatus,
    pub pathways: Vec<VisaPathway>,
    pub recommendation: String,
}

/// The full paid report. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyReport {
    pub diagnosis: PositionDiagnosis,
    pub market_comparison: MarketComparison,
    pub risk_map: Vec<RiskItem>,
    pub skill_gap: ByCountry<SkillGap>,
    pub resume_strategy: ByCountry<CountryResumeStrategy>,
    pub execution_plan: ExecutionPlan,
    pub company_fit: CompanyFit,
    pub visa_analysis: VisaAnalysis,
}
