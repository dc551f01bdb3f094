// Benchmark LLM prompt templates.

use crate::llm_client::prompts::fill_template;

pub const JOB_PROFILE_PROMPT: &str = r#"Generate a concise job profile for {role_name} ({job_level}).
Purpose: {role_purpose}

Return in this format:

**Job Requirements:**
- ...

**Key Responsibilities:**
- ...

**Personality Fit:**
- ..."#;

pub fn build_job_profile_prompt(role_name: &str, job_level: &str, role_purpose: &str) -> String {
    let purpose = if role_purpose.trim().is_empty() {
        "not specified"
    } else {
        role_purpose.trim()
    };
    fill_template(
        JOB_PROFILE_PROMPT,
        &[
            ("role_name", role_name.trim()),
            ("job_level", job_level.trim()),
            ("role_purpose", purpose),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_fills_every_placeholder() {
        let prompt = build_job_profile_prompt("Data Analyst", "Middle", "Ship weekly reports.");
        assert!(prompt.starts_with("Generate a concise job profile for Data Analyst (Middle)."));
        assert!(prompt.contains("Purpose: Ship weekly reports."));
        assert!(prompt.contains("**Personality Fit:**"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_prompt_without_purpose() {
        let prompt = build_job_profile_prompt("Data Analyst", "Middle", " ");
        assert!(prompt.contains("Purpose: not specified"));
    }

    #[test]
    fn test_prompt_keeps_braces_in_user_text() {
        let prompt = build_job_profile_prompt("Analyst {role_purpose}", "Middle", "Reports");
        assert!(prompt.contains("job profile for Analyst {role_purpose} (Middle)."));
        assert!(prompt.contains("Purpose: Reports"));
    }
}
