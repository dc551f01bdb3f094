// Benchmark Dashboard: overview statistics, cross-group comparison and the
// talent-variable breakdown for the selected role.

pub mod handlers;

use crate::errors::AppError;
use crate::matching::CachedMatches;
use crate::session::{resolve_role, SessionHeader};
use crate::state::AppState;

/// Resolves the role for a page request and fetches its (possibly cached) result set.
pub(crate) async fn load_matches(
    state: &AppState,
    role_id: Option<&str>,
    session: SessionHeader,
) -> Result<(String, CachedMatches), AppError> {
    let role_id = resolve_role(role_id, session, state.sessions.as_ref()).await?;
    let matches = state.matches.fetch_matches(&role_id).await?;
    Ok((role_id, matches))
}

/// Splits a comma-separated filter value, dropping blanks.
pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert!(split_list(None).is_empty());
        assert!(split_list(Some(" , ")).is_empty());
        assert_eq!(
            split_list(Some("Operations, Finance ,")),
            vec!["Operations", "Finance"]
        );
    }
}
