// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Output locale instruction appended to every report-producing prompt.
pub const LOCALE_INSTRUCTION: &str = "\
    LANGUAGE: Every human-readable text value in the JSON (summaries, reasons, tasks, \
    conclusions, checklist items) MUST be written in Korean. \
    Enum values, currency codes and company names stay exactly as specified.";

/// Builds a system prompt from a role sentence plus the JSON-only rule.
pub fn json_system(role: &str) -> String {
    format!("{role} {JSON_ONLY_SYSTEM}")
}

/// Substitutes `{key}` placeholders in one pass over `template`.
///
/// Substituted values are never rescanned, so a value that itself contains
/// `{key}` text is inserted verbatim. Braces that do not form a known
/// placeholder (JSON examples in prompts) are kept as-is.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_substitutes_known_keys() {
        let filled = fill_template("Hi {name}, {years} years", &[("name", "Ana"), ("years", "4")]);
        assert_eq!(filled, "Hi Ana, 4 years");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template(
            "Name: {name}\nScores: {scores}",
            &[("name", "{scores} {years}"), ("scores", "AU 80")],
        );
        assert_eq!(filled, "Name: {scores} {years}\nScores: AU 80");
    }

    #[test]
    fn test_fill_template_keeps_unrelated_braces() {
        let template = r#"Return {"score": {"au": 1}} for {name} {unknown"#;
        let filled = fill_template(template, &[("name", "Kim")]);
        assert_eq!(filled, r#"Return {"score": {"au": 1}} for Kim {unknown"#);
    }

    #[test]
    fn test_json_system_keeps_role_and_rule() {
        let system = json_system("You are a career market analyst.");
        assert!(system.starts_with("You are a career market analyst."));
        assert!(system.contains("valid JSON only"));
    }
}
