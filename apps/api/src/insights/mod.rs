// Talent Insights: candidate ranking, per-candidate radar and the AI-written summary of
// the strongest matches.

pub mod handlers;
pub mod prompts;
