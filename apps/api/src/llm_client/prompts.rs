// Shared prompt fragments and the template filler. Each feature that calls the LLM keeps
// its own prompts.rs alongside its handlers; this file holds what they have in common.

/// System prompt for every HR-facing narrative.
pub const HR_ANALYST_SYSTEM: &str = "You are an HR data analyst preparing material for an \
    internal talent review. Write in a formal, concise business tone. \
    Use only the facts given in the prompt and do not invent people, scores or metrics.";

/// Substitutes `{key}` placeholders in a single pass. Text inserted for one key is never
/// scanned again, so user input containing `{...}` stays literal. Unknown placeholders
/// are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = values.iter().find(|(key, _)| {
            tail[1..]
                .strip_prefix(*key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
