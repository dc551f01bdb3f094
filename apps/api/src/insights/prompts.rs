// Insight summary LLM prompt templates.

use crate::llm_client::prompts::fill_template;
use crate::projection::CandidateSummary;

/// How many top candidates the summary prompt describes.
pub const SUMMARY_CANDIDATES: usize = 3;

pub const INSIGHT_SUMMARY_PROMPT: &str = r#"Summarize insights based on the candidate match data below.

Job role ID: {role_id}
Role: {role_name}
Top candidates:
{top_candidates}

Explain:
1. What patterns do you observe among the top performers?
2. Which candidate shows the strongest alignment overall?
3. What development recommendations can be made for moderate matches?

Keep the language formal, concise, and in business tone (for HR presentation)."#;

/// One numbered line per candidate, e.g. `1. Ana Putri (E102) - 91.25%`.
pub fn format_candidates(candidates: &[CandidateSummary]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{}. {} ({}) - {:.2}%",
                i + 1,
                c.fullname,
                c.candidate_id,
                c.final_match_rate
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_insight_prompt(
    role_id: &str,
    role_name: Option<&str>,
    candidates: &[CandidateSummary],
) -> String {
    let top_candidates = format_candidates(candidates);
    fill_template(
        INSIGHT_SUMMARY_PROMPT,
        &[
            ("role_id", role_id),
            ("role_name", role_name.unwrap_or(role_id)),
            ("top_candidates", top_candidates.as_str()),
        ],
    )
}
