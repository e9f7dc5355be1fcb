//! Canned report content keyed by role archetype.
//!
//! Used by the report generator's deterministic fallback. Every section except the
//! diagnosis is static; the diagnosis is computed per candidate and merged in by
//! `ReportTemplate::into_report`.

use crate::analysis::models::{
    ByCountry, CompanyFit, CompanyRecommendation, CountryResumeStrategy, Currency,
    ExecutionPlan, ExecutionStep, Level, Market, MarketComparison, MonthPlan,
    PositionDiagnosis, RiskItem, SalaryRange, SkillGap, StrategyReport, TechStackProfile,
    VisaAnalysis, VisaPathway, VisaStatus,
};

const FRONTEND_KEYWORDS: &[&str] = &["react", "vue", "frontend", "css", "html"];
const BACKEND_KEYWORDS: &[&str] = &["java", "spring", "node", "backend", "aws", "db", "sql"];

/// Placeholder replaced with the candidate's name in template summaries.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Coarse role classification used to select a report template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    Frontend,
    Backend,
    Default,
}

impl Archetype {
    /// Case-insensitive keyword scan over the tech stack and job title.
    /// Frontend keywords win over backend keywords.
    pub fn detect(tech_stack: &[String], job_title: Option<&str>) -> Self {
        let mut text = tech_stack.join(" ");
        if let Some(title) = job_title {
            text.push(' ');
            text.push_str(title);
        }
        let text = text.to_lowercase();

        if FRONTEND_KEYWORDS.iter().any(|k| text.contains(k)) {
            Archetype::Frontend
        } else if BACKEND_KEYWORDS.iter().any(|k| text.contains(k)) {
            Archetype::Backend
        } else {
            Archetype::Default
        }
    }

    pub fn template(self) -> ReportTemplate {
        match self {
            Archetype::Frontend => frontend_template(),
            Archetype::Backend => backend_template(),
            Archetype::Default => default_template(),
        }
    }
}

/// Static parts of the diagnosis section.
#[derive(Debug, Clone)]
pub struct DiagnosisTemplate {
    /// Contains `NAME_PLACEHOLDER`.
    pub summary: &'static str,
    pub tech_stack: TechStackProfile,
    pub visa_risk: Level,
}

/// A full report skeleton minus the per-candidate diagnosis.
#[derive(Debug, Clone)]
pub struct ReportTemplate {
    pub diagnosis: DiagnosisTemplate,
    pub market_comparison: MarketComparison,
    pub risk_map: Vec<RiskItem>,
    pub skill_gap: ByCountry<SkillGap>,
    pub resume_strategy: ByCountry<CountryResumeStrategy>,
    pub execution_plan: ExecutionPlan,
    pub company_fit: CompanyFit,
    pub visa_analysis: VisaAnalysis,
}

impl ReportTemplate {
    pub fn into_report(self, diagnosis: PositionDiagnosis) -> StrategyReport {
        StrategyReport {
            diagnosis,
            market_comparison: self.market_comparison,
            risk_map: self.risk_map,
            skill_gap: self.skill_gap,
            resume_strategy: self.resume_strategy,
            execution_plan: self.execution_plan,
            company_fit: self.company_fit,
            visa_analysis: self.visa_analysis,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builders
// ────────────────────────────────────────────────────────────────────────────

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn salary(aud: (u64, u64), krw: (u64, u64)) -> ByCountry<SalaryRange> {
    ByCountry {
        australia: SalaryRange {
            min: aud.0,
            max: aud.1,
            currency: Currency::Aud,
        },
        korea: SalaryRange {
            min: krw.0,
            max: krw.1,
            currency: Currency::Krw,
        },
    }
}

fn risk(category: &str, text: &str, severity: Level) -> RiskItem {
    RiskItem {
        category: category.to_string(),
        risk: text.to_string(),
        severity,
        color: severity.color(),
    }
}

fn gap(market: Market, missing: &[&str], roadmap: &[&str]) -> SkillGap {
    SkillGap {
        market,
        missing_skills: strings(missing),
        roadmap: strings(roadmap),
    }
}

fn resume_strategy(focus: &[&str], checklist: &[&str]) -> CountryResumeStrategy {
    CountryResumeStrategy {
        focus: strings(focus),
        checklist: strings(checklist),
    }
}

fn month(focus: &str, steps: &[(u32, &str, &str)]) -> MonthPlan {
    MonthPlan {
        focus: focus.to_string(),
        steps: steps
            .iter()
            .map(|(week, task, description)| ExecutionStep {
                week: Some(*week),
                task: task.to_string(),
                description: Some(description.to_string()),
            })
            .collect(),
    }
}

fn companies(items: &[(&str, &str, u32)]) -> Vec<CompanyRecommendation> {
    items
        .iter()
        .map(|(name, reason, score)| CompanyRecommendation {
            name: name.to_string(),
            reason: reason.to_string(),
            match_score: *score,
        })
        .collect()
}

fn pathway(
    subclass: &str,
    name: &str,
    eligibility: Level,
    pros: &[&str],
    cons: &[&str],
    strategy: &str,
) -> VisaPathway {
    VisaPathway {
        subclass: subclass.to_string(),
        name: name.to_string(),
        eligibility,
        pros: strings(pros),
        cons: strings(cons),
        strategy: strategy.to_string(),
    }
}

fn visa(risk_level: Level, pathways: Vec<VisaPathway>, recommendation: &str) -> VisaAnalysis {
    VisaAnalysis {
        current_status: VisaStatus {
            visa_type: "N/A".to_string(),
            risk_level,
        },
        pathways,
        recommendation: recommendation.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Templates
// ────────────────────────────────────────────────────────────────────────────

fn frontend_template() -> ReportTemplate {
    ReportTemplate {
        diagnosis: DiagnosisTemplate {
            summary: "{name}님은 React/Vue 등 현대적인 웹 기술 스택을 갖춘 프론트엔드 개발자로, \
                      사용자 경험을 중시하는 서비스 기업에서 높은 수요가 예상됩니다.",
            tech_stack: TechStackProfile {
                depth: "Modern Frontend Frameworks (React/Next.js)".to_string(),
                breadth: "State Management, UI/UX".to_string(),
            },
            visa_risk: Level::Medium,
        },
        market_comparison: MarketComparison {
            salary: salary((90_000, 130_000), (45_000_000, 75_000_000)),
            trends: ByCountry {
                australia: strings(&["React Server Components", "Accessibility", "Design Systems"]),
                korea: strings(&["Next.js", "TypeScript", "App Optimization"]),
            },
            competition: ByCountry {
                australia: Level::High,
                korea: Level::High,
            },
            visa_barrier: Level::Medium,
            work_life_balance: ByCountry {
                australia: Level::High,
                korea: Level::Medium,
            },
            conclusion: "프론트엔드는 양국 모두 수요가 많지만, 호주는 디자인 시스템과 접근성을, \
                         한국은 성능 최적화를 더 중요하게 봅니다."
                .to_string(),
        },
        risk_map: vec![
            risk("Language", "협업 중심의 영어 커뮤니케이션 역량 필요", Level::High),
            risk("Visa", "경력 2년 미만이면 스폰서십 기회가 제한됨", Level::Medium),
            risk("Tech", "jQuery 등 구형 라이브러리 위주 경력은 감점 요인", Level::Low),
        ],
        skill_gap: ByCountry {
            australia: gap(
                Market::Australia,
                &["WCAG Accessibility", "Unit Testing (Jest/RTL)"],
                &["접근성 가이드라인(WCAG) 학습", "테스트 주도 개발(TDD) 연습", "영문 기술 블로그 운영"],
            ),
            korea: gap(
                Market::Korea,
                &["SSR Optimization", "State Management Architecture"],
                &["Next.js 심화 최적화 기법 습득", "대용량 트래픽 처리 경험 쌓기", "오픈소스 기여"],
            ),
        },
        resume_strategy: ByCountry {
            australia: resume_strategy(
                &["Problem Solving", "User Impact"],
                &["성과를 수치로 표현 (예: 성능 30% 개선)", "접근성/테스트 경험 강조", "비자 상태 명시"],
            ),
            korea: resume_strategy(
                &["Implementation Details", "Speed"],
                &["사용 기술 스택 상세 기재", "프로젝트 기여도 명시", "출시 서비스 링크 첨부"],
            ),
        },
        execution_plan: ExecutionPlan {
            month1: month(
                "기반 다지기",
                &[
                    (1, "영문 이력서 작성", "ATS 친화적인 포맷으로 변환"),
                    (2, "링크드인 프로필 정비", "헤드라인과 요약 섹션 강화"),
                ],
            ),
            month2: month(
                "시장 공략",
                &[
                    (5, "타겟 기업 30곳 지원", "매주 5개 기업 맞춤 지원"),
                    (6, "모의 인터뷰", "화상 영어 인터뷰 연습"),
                ],
            ),
            month3: month(
                "최종 협상",
                &[
                    (9, "기술 과제 수행", "테이크홈 과제 완성도 높이기"),
                    (11, "오퍼 레터 검토", "연봉과 복지 조건 비교"),
                ],
            ),
        },
        company_fit: CompanyFit {
            australia: companies(&[
                ("Canva", "디자인 중심의 프론트엔드 개발 문화", 95),
                ("Atlassian", "대규모 디자인 시스템 경험 우대", 90),
            ]),
            korea: companies(&[
                ("Toss", "최고 수준의 UX 구현 역량 요구", 92),
                ("Danggeun", "지역 기반 서비스 최적화", 88),
            ]),
            conclusion: "사용자 경험을 중시하는 Canva(호주)와 Toss(한국)가 가장 잘 맞는 기업입니다."
                .to_string(),
        },
        visa_analysis: visa(
            Level::Medium,
            vec![
                pathway(
                    "482",
                    "TSS Visa",
                    Level::Medium,
                    &["빠른 수속"],
                    &["고용주 종속"],
                    "스폰서십이 가능한 스타트업 공략",
                ),
                pathway(
                    "189",
                    "Skilled Independent",
                    Level::Low,
                    &["영주권"],
                    &["높은 점수 커트라인"],
                    "영어 점수(PTE) 고득점 확보 필수",
                ),
            ],
            "경력이 3년 미만이라면 워킹홀리데이로 시작해 482 스폰서십을 노리는 전략이 효과적입니다.",
        ),
    }
}

fn backend_template() -> ReportTemplate {
    ReportTemplate {
        diagnosis: DiagnosisTemplate {
            summary: "{name}님은 견고한 백엔드 시스템 설계 경험을 갖추고 있으며, 클라우드와 데이터 처리에 \
                      강점이 있어 양국 모두에서 핵심 인재로 분류됩니다.",
            tech_stack: TechStackProfile {
                depth: "Server-side Logic & Database".to_string(),
                breadth: "Cloud Infra & Architecture".to_string(),
            },
            visa_risk: Level::Low,
        },
        market_comparison: MarketComparison {
            salary: salary((100_000, 150_000), (50_000_000, 90_000_000)),
            trends: ByCountry {
                australia: strings(&["Microservices", "AWS Lambda", "Go/Rust"]),
                korea: strings(&["Spring Boot", "MSA", "Kafka"]),
            },
            competition: ByCountry {
                australia: Level::Medium,
                korea: Level::High,
            },
            visa_barrier: Level::Low,
            work_life_balance: ByCountry {
                australia: Level::High,
                korea: Level::Medium,
            },
            conclusion: "백엔드 엔지니어는 비자 취득에 가장 유리한 직군 중 하나이며, 호주는 연봉 상한이 \
                         매우 높습니다."
                .to_string(),
        },
        risk_map: vec![
            risk("System Design", "대규모 시스템 설계 경험이 없으면 한계가 있음", Level::Medium),
            risk("Language", "기술 용어 외 비즈니스 커뮤니케이션 역량", Level::Medium),
            risk("Visa", "비전공자는 경력 인정 기간이 줄어들 수 있음", Level::Low),
        ],
        skill_gap: ByCountry {
            australia: gap(
                Market::Australia,
                &["System Design (English)", "Cloud Certifications (AWS/Azure)"],
                &["영어 시스템 디자인 인터뷰 준비", "AWS Solutions Architect 자격 취득"],
            ),
            korea: gap(
                Market::Korea,
                &["High Traffic Handling", "Event Driven Architecture"],
                &["대용량 트래픽 처리 아키텍처 학습", "Kafka/RabbitMQ 실무 적용"],
            ),
        },
        resume_strategy: ByCountry {
            australia: resume_strategy(
                &["Scale & Reliability", "Ownership"],
                &["처리한 트래픽 규모 명시 (TPS 등)", "시스템 안정성 기여 서술", "오너십 강조"],
            ),
            korea: resume_strategy(
                &["Architecture Decision", "Framework Deep-dive"],
                &["프레임워크 선정 이유", "DB 설계 및 최적화 경험", "장애 대응 사례"],
            ),
        },
        execution_plan: ExecutionPlan {
            month1: month(
                "기초 역량 확보",
                &[
                    (1, "알고리즘 문제 풀이 (LeetCode)", "Medium 난이도 50문제 풀기"),
                    (3, "시스템 디자인 학습", "주요 아키텍처 패턴 정리"),
                ],
            ),
            month2: month(
                "실전 지원 준비",
                &[
                    (5, "영문 이력서 피드백 반영", "원어민 첨삭 받기"),
                    (7, "모의 코딩 테스트", "HackerRank 테스트 응시"),
                ],
            ),
            month3: month(
                "면접과 오퍼",
                &[
                    (10, "행동 면접 준비", "Leadership Principles 기반 답변 정리"),
                    (12, "비자 서류 준비", "경력 증명서 번역 공증"),
                ],
            ),
        },
        company_fit: CompanyFit {
            australia: companies(&[
                ("Xero", "SaaS 기반 대규모 회계 시스템", 93),
                ("Amazon (AU)", "클라우드와 백엔드 기술의 정점", 89),
            ]),
            korea: companies(&[
                ("Line", "대규모 글로벌 메신저 트래픽", 91),
                ("Coupang", "이커머스 MSA 아키텍처", 90),
            ]),
            conclusion: "안정적인 기술 환경을 원하면 Xero, 도전적인 트래픽을 원하면 Coupang이 적합합니다."
                .to_string(),
        },
        visa_analysis: visa(
            Level::Low,
            vec![pathway(
                "189/190",
                "Skilled Visa",
                Level::High,
                &["독립 영주권"],
                &["점수 경쟁"],
                "ACS 기술 심사 통과 후 190 주정부 후원 노리기",
            )],
            "백엔드 개발자는 부족 직군(MLTSSL)에 포함되므로 독립 기술 이민(189/190)을 우선 고려하세요.",
        ),
    }
}

fn default_template() -> ReportTemplate {
    ReportTemplate {
        diagnosis: DiagnosisTemplate {
            summary: "{name}님의 경력은 IT 산업 전반에서 유효하며, 특정 분야로 전문성을 좁히면 \
                      더 높은 경쟁력을 확보할 수 있습니다.",
            tech_stack: TechStackProfile {
                depth: "General IT Skills".to_string(),
                breadth: "Versatile Experience".to_string(),
            },
            visa_risk: Level::Medium,
        },
        market_comparison: MarketComparison {
            salary: salary((80_000, 120_000), (40_000_000, 70_000_000)),
            trends: ByCountry {
                australia: strings(&["Digital Transformation", "Agile"]),
                korea: strings(&["Digital New Deal", "Smart Factory"]),
            },
            competition: ByCountry {
                australia: Level::Medium,
                korea: Level::High,
            },
            visa_barrier: Level::Medium,
            work_life_balance: ByCountry {
                australia: Level::High,
                korea: Level::Low,
            },
            conclusion: "일반적인 IT 경력이라면 호주의 워라밸과 한국의 익숙한 환경 사이에서 선택이 필요합니다."
                .to_string(),
        },
        risk_map: vec![
            risk("Specialization", "명확한 전문 분야 부재", Level::High),
            risk("Language", "비즈니스 영어 필수", Level::High),
            risk("Market", "제너럴리스트 간 경쟁 심화", Level::Medium),
        ],
        skill_gap: ByCountry {
            australia: gap(
                Market::Australia,
                &["English Proficiency", "Specialized Tech Stack"],
                &["전문 기술 트랙 선택", "영어 점수 확보"],
            ),
            korea: gap(
                Market::Korea,
                &["Project Leading", "Industry Expertise"],
                &["산업 도메인 전문성 강화", "PM/PL 역량 확보"],
            ),
        },
        resume_strategy: ByCountry {
            australia: resume_strategy(
                &["Skill Definition", "Achievement"],
                &["자신의 역할을 한 문장으로 정의", "정량적 성과 발굴"],
            ),
            korea: resume_strategy(
                &["Organization Fit", "Stability"],
                &["조직 적응력 강조", "장기 근속 의지 표현"],
            ),
        },
        execution_plan: ExecutionPlan {
            month1: month("진로 탐색", &[(1, "직무 적성 점검", "구체적인 전문 분야 설정")]),
            month2: month("역량 강화", &[(5, "사이드 프로젝트 시작", "포트폴리오 만들기")]),
            month3: month("지원과 검증", &[(9, "채용 공고 매칭", "적합한 포지션 탐색")]),
        },
        company_fit: CompanyFit {
            australia: companies(&[("Telstra", "대형 통신사, 다양한 IT 직군", 80)]),
            korea: companies(&[("Samsung SDS", "대규모 IT 서비스, 안정성", 85)]),
            conclusion: "대기업 SI/SM 직군이나 대규모 인프라를 운영하는 기업이 적합할 수 있습니다."
                .to_string(),
        },
        visa_analysis: visa(
            Level::Medium,
            vec![pathway(
                "482",
                "TSS",
                Level::Medium,
                &["취업 우선"],
                &["스폰서 구하기 어려움"],
                "채용 연계형 비자 스폰서십 모색",
            )],
            "명확한 기술 직군으로 포지셔닝하는 것이 비자 승인의 핵심입니다.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(items: &[&str]) -> Vec<String> {
        strings(items)
    }

    #[test]
    fn test_react_is_frontend() {
        assert_eq!(
            Archetype::detect(&stack(&["React"]), None),
            Archetype::Frontend
        );
    }

    #[test]
    fn test_spring_is_backend() {
        assert_eq!(
            Archetype::detect(&stack(&["Spring"]), None),
            Archetype::Backend
        );
    }

    #[test]
    fn test_detection_is_case_insensitive() {
        assert_eq!(
            Archetype::detect(&stack(&["VUE.JS"]), None),
            Archetype::Frontend
        );
        assert_eq!(
            Archetype::detect(&stack(&["PostgreSQL"]), None),
            Archetype::Backend
        );
    }

    #[test]
    fn test_empty_or_unmatched_is_default() {
        assert_eq!(Archetype::detect(&[], None), Archetype::Default);
        assert_eq!(
            Archetype::detect(&stack(&["Excel", "Tableau"]), Some("Analyst")),
            Archetype::Default
        );
    }

    #[test]
    fn test_job_title_participates_in_detection() {
        assert_eq!(
            Archetype::detect(&[], Some("Senior Backend Engineer")),
            Archetype::Backend
        );
    }

    #[test]
    fn test_frontend_wins_over_backend() {
        assert_eq!(
            Archetype::detect(&stack(&["Node.js", "React", "AWS"]), None),
            Archetype::Frontend
        );
    }

    #[test]
    fn test_every_template_is_complete() {
        for archetype in [Archetype::Frontend, Archetype::Backend, Archetype::Default] {
            let template = archetype.template();
            assert!(template.diagnosis.summary.contains(NAME_PLACEHOLDER));
            assert!(!template.risk_map.is_empty());
            assert!(!template.company_fit.australia.is_empty());
            assert!(!template.company_fit.korea.is_empty());
            assert!(!template.visa_analysis.pathways.is_empty());
            assert_eq!(template.skill_gap.australia.market, Market::Australia);
            assert_eq!(template.skill_gap.korea.market, Market::Korea);
            let salary = &template.market_comparison.salary;
            assert!(salary.australia.min < salary.australia.max);
            assert_eq!(salary.korea.currency, Currency::Krw);
        }
    }

    #[test]
    fn test_risk_colors_follow_severity() {
        for risk in backend_template().risk_map {
            assert_eq!(risk.color, risk.severity.color());
        }
    }
}
