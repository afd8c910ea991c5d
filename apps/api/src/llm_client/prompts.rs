// Shared prompt constants and prompt-building utilities.
// Each analyzer defines its own templates in analysis/prompts.rs.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Scoring rubric shared by every scored analysis. Counteracts the model's
/// habit of clustering everything between 70 and 79.
pub const SCORING_RUBRIC: &str = "\
Scoring guidance:
- Use the FULL range from 0 to 100.
- Exceptional quality: 90-100.
- Strong: 80-89.
- Good: 75-79.
- Average: 65-74.
- Below average: below 65.
- Be fair: if the subject is truly outstanding, do not hesitate to score above 90.
- Avoid clustering all scores in a narrow range.";

/// Appended to every analysis prompt that carries a numeric score field.
pub const SCORE_FORMAT_INSTRUCTION: &str = "\
IMPORTANT: the score must be a raw number between 0 and 100 (integer or float) \
without a percent sign.";

/// Joins a system fragment with a role preamble.
pub fn system_prompt(role: &str) -> String {
    format!("{role} {JSON_ONLY_SYSTEM}")
}

/// Fills `{name}` placeholders in one scan of `template`. Substituted values
/// are never scanned again, so braces inside user text stay literal. Braces
/// that do not name a variable are kept as written.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = after.find('}').and_then(|close| {
            let name = &after[..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match hit {
            Some((close, value)) => {
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
