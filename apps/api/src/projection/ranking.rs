use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::matching::MatchResultRow;
use crate::projection::{distinct_candidates, MeanAcc};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateSummary {
    pub candidate_id: String,
    pub fullname: String,
    pub final_match_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RadarPoint {
    pub label: String,
    pub value: f64,
}

/// Best `n` candidates by final rate. Ties go to the smaller candidate id.
pub fn top_n(rows: &[MatchResultRow], n: usize) -> Vec<CandidateSummary> {
    let mut ranked: Vec<CandidateSummary> = distinct_candidates(rows)
        .into_iter()
        .map(|c| CandidateSummary {
            candidate_id: c.row.candidate_id.clone(),
            fullname: c.row.fullname.clone(),
            final_match_rate: c.final_match_rate,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.final_match_rate
            .total_cmp(&a.final_match_rate)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });
    ranked.truncate(n);
    ranked
}

/// Radar axes for one candidate: mean group match rate per label, labels ascending.
/// Empty when the candidate has no rows.
pub fn radar_coordinates(rows: &[MatchResultRow], candidate_id: &str) -> Vec<RadarPoint> {
    let mut axes: BTreeMap<&str, MeanAcc> = BTreeMap::new();
    for r in rows.iter().filter(|r| r.candidate_id == candidate_id) {
        axes.entry(r.tgv_name.as_str())
            .or_default()
            .push(Some(r.tgv_match_rate));
    }

    axes.into_iter()
        .filter_map(|(label, acc)| {
            acc.value().map(|value| RadarPoint {
                label: label.to_string(),
                value,
            })
        })
        .collect()
}
