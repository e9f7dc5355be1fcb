//! Resume Parser — extracts a structured `ParsedResume` from raw resume text.
//!
//! Never fails: without a model credential, or on any call/parse failure, the fixed
//! fallback profile is returned (still carrying the caller's `raw_text`).

use tracing::{info, warn};

use crate::analysis::models::{Complexity, ParsedResume, ProjectAnalysis, SeniorityLevel};
use crate::analysis::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_ROLE};
use crate::llm_client::prompts::{fill_template, json_system, LOCALE_INSTRUCTION};
use crate::llm_client::{CompletionRequest, LlmError, ModelProvider};

/// Low temperature: extraction favors determinism over creativity.
const PARSE_TEMPERATURE: f32 = 0.3;

/// Parses resume text with the model, falling back to the canned profile on any failure.
pub async fn parse_resume(resume_text: &str, llm: &ModelProvider) -> ParsedResume {
    if llm.is_offline() {
        info!("No model credential configured — using fallback resume profile");
        return fallback_resume(resume_text);
    }

    match request_parse(resume_text, llm).await {
        Ok(parsed) => {
            info!(
                "Resume parsed: seniority={:?}, tech_stack={}, projects={}",
                parsed.seniority_level,
                parsed.tech_stack.len(),
                parsed.projects.len()
            );
            parsed
        }
        Err(e) => {
            warn!("Resume parsing failed, returning fallback profile: {e}");
            fallback_resume(resume_text)
        }
    }
}

async fn request_parse(resume_text: &str, llm: &ModelProvider) -> Result<ParsedResume, LlmError> {
    let prompt = fill_template(
        RESUME_PARSE_PROMPT_TEMPLATE,
        &[
            ("locale_instruction", LOCALE_INSTRUCTION),
            ("resume_text", resume_text),
        ],
    );
    let system = json_system(RESUME_PARSE_ROLE);

    let parsed: ParsedResume = llm
        .request_json(&CompletionRequest {
            system: &system,
            prompt: &prompt,
            temperature: PARSE_TEMPERATURE,
        })
        .await?;

    Ok(parsed.with_raw_text(resume_text))
}

/// The fixed profile used by the free tier when the model is unavailable.
pub fn fallback_resume(raw_text: &str) -> ParsedResume {
    ParsedResume {
        name: Some("김철수".to_string()),
        job_title: Some("시니어 풀스택 엔지니어".to_string()),
        summary: Some(
            "확장 가능한 웹 애플리케이션과 클라우드 인프라 구축에 능숙한 5년 차 풀스택 엔지니어입니다."
                .to_string(),
        ),
        tech_stack: [
            "React",
            "TypeScript",
            "Node.js",
            "Next.js",
            "Tailwind CSS",
            "PostgreSQL",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        years_of_experience: 5.0,
        industry: "소프트웨어 개발".to_string(),
        seniority_level: SeniorityLevel::Senior,
        projects: vec![
            ProjectAnalysis {
                name: "이커머스 플랫폼 개발".to_string(),
                technologies: vec![
                    "React".to_string(),
                    "Node.js".to_string(),
                    "MongoDB".to_string(),
                ],
                complexity: Complexity::High,
                description: "일일 활성 사용자 1만 명 규모의 확장 가능한 이커머스 플랫폼을 구축했습니다."
                    .to_string(),
            },
            ProjectAnalysis {
                name: "실시간 채팅 애플리케이션".to_string(),
                technologies: vec![
                    "Socket.io".to_string(),
                    "Express".to_string(),
                    "Redis".to_string(),
                ],
                complexity: Complexity::Medium,
                description: "Socket.io 기반 실시간 메시징 기능을 개발하고 최적화했습니다."
                    .to_string(),
            },
        ],
        raw_text: raw_text.to_string(),
    }
}
