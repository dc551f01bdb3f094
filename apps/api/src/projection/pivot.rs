use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::matching::MatchResultRow;
use crate::projection::{distinct_candidates, MeanAcc};

/// Wide form of one candidate: every observed group label becomes a column.
///
/// `groups` holds one entry per label seen anywhere in the result set. A candidate without
/// rows for a label has `None` there, never zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PivotedCandidateRow {
    pub candidate_id: String,
    pub fullname: String,
    pub directorate: Option<String>,
    pub grade: Option<String>,
    pub final_match_rate: f64,
    #[serde(flatten)]
    pub groups: BTreeMap<String, Option<f64>>,
}

#[cfg(test)]
impl PivotedCandidateRow {
    /// Group match rate for `label`, `None` when the candidate has no rows for it.
    pub fn rate(&self, label: &str) -> Option<f64> {
        self.groups.get(label).copied().flatten()
    }
}

/// Sorted distinct group labels: the pivot's column set.
pub fn group_labels(rows: &[MatchResultRow]) -> Vec<String> {
    rows.iter()
        .map(|r| r.tgv_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Pivots rows into one row per candidate keyed by group label.
///
/// Algorithm:
/// 1. Mean `tgv_match_rate` per (candidate, group label)
/// 2. Join back identity fields and the max final rate per candidate
/// 3. Fill labels the candidate lacks with `None`
///
/// Candidates come out in first-appearance order.
pub fn pivot_by_group(rows: &[MatchResultRow]) -> Vec<PivotedCandidateRow> {
    let labels = group_labels(rows);

    let mut cells: HashMap<(&str, &str), MeanAcc> = HashMap::new();
    for r in rows {
        cells
            .entry((r.candidate_id.as_str(), r.tgv_name.as_str()))
            .or_default()
            .push(Some(r.tgv_match_rate));
    }

    distinct_candidates(rows)
        .into_iter()
        .map(|candidate| {
            let id = candidate.row.candidate_id.as_str();
            let groups = labels
                .iter()
                .map(|label| {
                    let value = cells
                        .get(&(id, label.as_str()))
                        .and_then(|acc| acc.value());
                    (label.clone(), value)
                })
                .collect();

            PivotedCandidateRow {
                candidate_id: id.to_string(),
                fullname: candidate.row.fullname.clone(),
                directorate: candidate.row.directorate.clone(),
                grade: candidate.row.grade.clone(),
                final_match_rate: candidate.final_match_rate,
                groups,
            }
        })
        .collect()
}
