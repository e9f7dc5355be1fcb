// All LLM prompt constants for the analysis pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Role sentence for resume extraction.
pub const RESUME_PARSE_ROLE: &str = "You are a professional resume analyzer.";

/// Resume extraction prompt. Replace `{locale_instruction}` and `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"Analyze the resume below and extract structured information.

{locale_instruction}

RESUME:
{resume_text}

Return a JSON object with this EXACT schema:
{
  "name": "full name of the candidate",
  "jobTitle": "current or most recent job title (e.g. Senior Full-stack Engineer)",
  "summary": "professional summary in 2-3 sentences",
  "techStack": ["technologies, languages and frameworks"],
  "yearsOfExperience": 5,
  "industry": "main industry (e.g. fintech, e-commerce, healthcare)",
  "seniorityLevel": "junior" | "mid" | "senior" | "lead",
  "projects": [
    {
      "name": "project name",
      "technologies": ["technologies used"],
      "complexity": "low" | "medium" | "high",
      "description": "short description"
    }
  ]
}

Rules:
- yearsOfExperience is a non-negative number of years of professional experience.
- Keep techStack item names in their original (usually English) spelling.
- If something is unclear, make a reasonable inference from context."#;

/// Role sentence for market scoring.
pub const MARKET_SCORE_ROLE: &str = "You are a career market analyst specializing in tech job \
    markets in Australia and South Korea.";

/// Market scoring prompt.
/// Replace: {tech_stack}, {years}, {industry}, {seniority}, {project_count}
pub const MARKET_SCORE_PROMPT_TEMPLATE: &str = r#"Analyze this candidate profile and calculate market fit scores (0-100) for both countries.

Candidate Profile:
- Tech Stack: {tech_stack}
- Years of Experience: {years}
- Industry: {industry}
- Seniority: {seniority}
- Number of Projects: {project_count}

Weigh these factors for each market:
1. Market Demand: how in-demand is this tech stack?
2. English Requirement: language barrier impact (Australia requires fluent English)
3. Visa Difficulty: how hard is it to get a work visa?
4. Competition Level: how competitive is the market for this profile?
5. Salary Fit: does the experience level match typical salary expectations?

Return a JSON object:
{
  "australiaScore": 0-100,
  "koreaScore": 0-100,
  "factors": {
    "marketDemand": 0-100 (average of both markets),
    "englishRequirement": 0-100 (higher = stronger English needed),
    "visaDifficulty": 0-100 (higher = harder to get a visa),
    "competitionLevel": 0-100 (higher = more competitive),
    "salaryFit": 0-100 (higher = better salary match for experience)
  }
}

All values are integers. Be realistic and data-driven."#;

/// Role sentence for the strategy report.
pub const REPORT_ROLE: &str = "You are a senior career and migration strategist helping a tech \
    professional decide between working in Australia and South Korea.";

/// Strategy report prompt.
/// Replace: {locale_instruction}, {name}, {job_title}, {tech_stack}, {years}, {industry},
///          {seniority}, {project_summary}, {market_scores}
pub const REPORT_PROMPT_TEMPLATE: &str = r#"{locale_instruction}

Candidate Profile:
- Name: {name}
- Job Title: {job_title}
- Tech Stack: {tech_stack}
- Years of Experience: {years}
- Industry: {industry}
- Seniority: {seniority}
- Projects: {project_summary}

Market Scores:
{market_scores}

Produce a complete strategy report as a JSON object with this EXACT schema:
{
  "diagnosis": {
    "experienceLevel": "Junior" | "Mid" | "Senior" | "Lead",
    "techStack": {"depth": "where the candidate is deep", "breadth": "where the candidate is broad"},
    "marketAlignment": {"australia": 0-100, "korea": 0-100},
    "visaRisk": "Low" | "Medium" | "High",
    "languageRisk": "Low" | "Medium" | "High",
    "portfolioSignal": "Weak" | "Moderate" | "Strong",
    "summary": "one sentence describing the candidate's current market position"
  },
  "marketComparison": {
    "salary": {
      "australia": {"min": 90000, "max": 130000, "currency": "AUD"},
      "korea": {"min": 45000000, "max": 75000000, "currency": "KRW"}
    },
    "trends": {"australia": ["trend"], "korea": ["trend"]},
    "competition": {"australia": "Low" | "Medium" | "High", "korea": "Low" | "Medium" | "High"},
    "visaBarrier": "Low" | "Medium" | "High",
    "workLifeBalance": {"australia": "Low" | "Medium" | "High", "korea": "Low" | "Medium" | "High"},
    "conclusion": "comparison conclusion"
  },
  "riskMap": [
    {"category": "Language", "risk": "specific risk", "severity": "Low" | "Medium" | "High", "color": "green" | "yellow" | "red"}
  ],
  "skillGap": {
    "australia": {"market": "Australia", "missingSkills": ["skill"], "roadmap": ["step"]},
    "korea": {"market": "Korea", "missingSkills": ["skill"], "roadmap": ["step"]}
  },
  "resumeStrategy": {
    "australia": {"focus": ["tag"], "checklist": ["item"]},
    "korea": {"focus": ["tag"], "checklist": ["item"]}
  },
  "executionPlan": {
    "month1": {"focus": "label", "steps": [{"week": 1, "task": "task", "description": "details"}]},
    "month2": {"focus": "label", "steps": [{"week": 5, "task": "task", "description": "details"}]},
    "month3": {"focus": "label", "steps": [{"week": 9, "task": "task", "description": "details"}]}
  },
  "companyFit": {
    "australia": [{"name": "Company", "reason": "why it fits", "matchScore": 0-100}],
    "korea": [{"name": "Company", "reason": "why it fits", "matchScore": 0-100}],
    "conclusion": "overall company fit conclusion"
  },
  "visaAnalysis": {
    "currentStatus": {"visaType": "current visa or N/A", "riskLevel": "Low" | "Medium" | "High"},
    "pathways": [
      {"subclass": "482", "name": "visa name", "eligibility": "Low" | "Medium" | "High", "pros": ["pro"], "cons": ["con"], "strategy": "how to pursue it"}
    ],
    "recommendation": "overall visa recommendation"
  }
}

HARD RULES:
1. color MUST follow severity: Low → "green", Medium → "yellow", High → "red"
2. riskMap has 3-5 items; each month has 2-4 steps; weeks run 1-12 across the three months
3. Salary ranges are realistic annual figures for this profile (AUD for Australia, KRW for Korea)
4. Recommend 2-3 real companies per country
5. Be specific, actionable and realistic"#;
