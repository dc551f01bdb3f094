use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::matching::MatchResultRow;
use crate::projection::{distinct_candidates, MeanAcc};

/// Headline statistics over distinct candidates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSummary {
    pub count: usize,
    pub mean_final: Option<f64>,
    pub max_final: Option<f64>,
    pub min_final: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Directorate,
    Grade,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupAverage {
    pub label: String,
    pub mean_final: f64,
    pub candidates: usize,
}

/// Summarizes the final match rate across candidates.
///
/// Every candidate contributes one row per group label, so the flat rows are collapsed to
/// one value per candidate first. Averaging the raw rows would weight candidates by how
/// many groups they have.
pub fn summarize(rows: &[MatchResultRow]) -> MatchSummary {
    let finals: Vec<f64> = distinct_candidates(rows)
        .iter()
        .map(|c| c.final_match_rate)
        .collect();

    if finals.is_empty() {
        return MatchSummary {
            count: 0,
            mean_final: None,
            max_final: None,
            min_final: None,
        };
    }

    let sum: f64 = finals.iter().sum();
    MatchSummary {
        count: finals.len(),
        mean_final: Some(sum / finals.len() as f64),
        max_final: finals.iter().copied().reduce(f64::max),
        min_final: finals.iter().copied().reduce(f64::min),
    }
}

/// Equal-width histogram of per-candidate final rates between the observed min and max.
/// The last bin is closed on both ends; a single distinct value yields one bin.
pub fn final_rate_histogram(rows: &[MatchResultRow], bins: usize) -> Vec<HistogramBin> {
    let finals: Vec<f64> = distinct_candidates(rows)
        .iter()
        .map(|c| c.final_match_rate)
        .collect();

    let (Some(min), Some(max)) = (
        finals.iter().copied().reduce(f64::min),
        finals.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    if bins <= 1 || max <= min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: finals.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in finals {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }

    out
}

/// Mean final rate per directorate or grade, over distinct candidates.
/// Candidates without a value for the dimension are left out.
pub fn mean_final_by(rows: &[MatchResultRow], dimension: Dimension) -> Vec<GroupAverage> {
    let mut groups: HashMap<&str, MeanAcc> = HashMap::new();

    for candidate in distinct_candidates(rows) {
        let label = match dimension {
            Dimension::Directorate => candidate.row.directorate.as_deref(),
            Dimension::Grade => candidate.row.grade.as_deref(),
        };
        if let Some(label) = label {
            groups
                .entry(label)
                .or_default()
                .push(Some(candidate.final_match_rate));
        }
    }

    let mut out: Vec<GroupAverage> = groups
        .into_iter()
        .filter_map(|(label, acc)| {
            acc.value().map(|mean_final| GroupAverage {
                label: label.to_string(),
                mean_final,
                candidates: acc.count(),
            })
        })
        .collect();

    out.sort_by(|a, b| {
        b.mean_final
            .total_cmp(&a.mean_final)
            .then_with(|| a.label.cmp(&b.label))
    });
    out
}

/// Keeps rows whose directorate and grade are in the given lists. An empty list does not
/// filter on that field.
pub fn filter_rows(
    rows: &[MatchResultRow],
    directorates: &[String],
    grades: &[String],
) -> Vec<MatchResultRow> {
    let keep = |value: &Option<String>, allowed: &[String]| {
        allowed.is_empty()
            || value
                .as_deref()
                .is_some_and(|v| allowed.iter().any(|a| a == v))
    };

    rows.iter()
        .filter(|r| keep(&r.directorate, directorates) && keep(&r.grade, grades))
        .cloned()
        .collect()
}
