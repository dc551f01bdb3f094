//! View Projection: pure reshaping of a retrieved match result set into the shapes the
//! dashboard pages draw: summary statistics, a wide per-group pivot, rankings, radar
//! coordinates and the talent-variable breakdown.
//!
//! No I/O and no shared state: every function takes a borrowed slice of rows and returns
//! freshly built values.

pub mod pivot;
pub mod ranking;
pub mod summary;
pub mod talent_variables;

use std::collections::HashMap;

use crate::models::matching::MatchResultRow;

pub use pivot::{group_labels, pivot_by_group, PivotedCandidateRow};
pub use ranking::{radar_coordinates, top_n, CandidateSummary, RadarPoint};
pub use summary::{
    filter_rows, final_rate_histogram, mean_final_by, summarize, Dimension, GroupAverage,
    HistogramBin, MatchSummary,
};
pub use talent_variables::{per_variable_benchmark, VariableBenchmark};

/// One candidate collapsed out of the flat result set.
///
/// `row` is the candidate's first row in input order and carries the identity fields.
/// `final_match_rate` is the max over all of the candidate's rows.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CandidateFacts<'a> {
    pub row: &'a MatchResultRow,
    pub final_match_rate: f64,
}

/// Deduplicates rows by candidate identifier, preserving first-appearance order.
pub(crate) fn distinct_candidates(rows: &[MatchResultRow]) -> Vec<CandidateFacts<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<CandidateFacts<'_>> = Vec::new();

    for row in rows {
        match index.get(row.candidate_id.as_str()) {
            Some(&i) => {
                let facts = &mut out[i];
                facts.final_match_rate = facts.final_match_rate.max(row.final_match_rate);
            }
            None => {
                index.insert(row.candidate_id.as_str(), out.len());
                out.push(CandidateFacts {
                    row,
                    final_match_rate: row.final_match_rate,
                });
            }
        }
    }

    out
}

/// Running arithmetic mean that skips missing values.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct MeanAcc {
    sum: f64,
    n: usize,
}

impl MeanAcc {
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            self.sum += v;
            self.n += 1;
        }
    }

    pub fn value(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }

    pub fn count(&self) -> usize {
        self.n
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::matching::MatchResultRow;

    /// Row with only the identity, group and rate fields set.
    pub fn row(candidate: &str, group: &str, group_rate: f64, final_rate: f64) -> MatchResultRow {
        MatchResultRow {
            candidate_id: candidate.to_string(),
            fullname: format!("Name {candidate}"),
            directorate: None,
            grade: None,
            tgv_name: group.to_string(),
            tgv_match_rate: group_rate,
            final_match_rate: final_rate,
            tv_name: None,
            baseline_score: None,
            user_score: None,
            tv_match_rate: None,
        }
    }

    pub fn placed(
        candidate: &str,
        directorate: &str,
        grade: &str,
        final_rate: f64,
    ) -> MatchResultRow {
        MatchResultRow {
            directorate: Some(directorate.to_string()),
            grade: Some(grade.to_string()),
            ..row(candidate, "Competency", final_rate, final_rate)
        }
    }

    pub fn tv(variable: &str, baseline: f64, user: f64, rate: f64) -> MatchResultRow {
        MatchResultRow {
            tv_name: Some(variable.to_string()),
            baseline_score: Some(baseline),
            user_score: Some(user),
            tv_match_rate: Some(rate),
            ..row("C1", "Competency", rate, rate)
        }
    }

    /// The three-row scenario used across the projection tests.
    pub fn scenario() -> Vec<MatchResultRow> {
        vec![
            row("C1", "Competency", 80.0, 90.0),
            row("C1", "Psychometric", 70.0, 90.0),
            row("C2", "Competency", 60.0, 60.0),
        ]
    }
}
