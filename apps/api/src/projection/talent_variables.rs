use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::matching::MatchResultRow;
use crate::projection::MeanAcc;

/// Average baseline vs candidate score for one talent variable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableBenchmark {
    pub variable: String,
    pub mean_baseline: Option<f64>,
    pub mean_user: Option<f64>,
    pub mean_match_rate: Option<f64>,
    pub samples: usize,
}

#[derive(Default)]
struct VariableAcc {
    baseline: MeanAcc,
    user: MeanAcc,
    rate: MeanAcc,
    samples: usize,
}

/// Averages the talent-variable breakdown per variable, best matched first.
///
/// Rows without a talent variable are skipped. Missing numeric fields are left out of
/// their mean; a variable with no match rate at all sorts last.
pub fn per_variable_benchmark(rows: &[MatchResultRow]) -> Vec<VariableBenchmark> {
    let mut vars: HashMap<&str, VariableAcc> = HashMap::new();

    for r in rows {
        let Some(variable) = r.tv_name.as_deref() else {
            continue;
        };
        let acc = vars.entry(variable).or_default();
        acc.baseline.push(r.baseline_score);
        acc.user.push(r.user_score);
        acc.rate.push(r.tv_match_rate);
        acc.samples += 1;
    }

    let mut out: Vec<VariableBenchmark> = vars
        .into_iter()
        .map(|(variable, acc)| VariableBenchmark {
            variable: variable.to_string(),
            mean_baseline: acc.baseline.value(),
            mean_user: acc.user.value(),
            mean_match_rate: acc.rate.value(),
            samples: acc.samples,
        })
        .collect();

    out.sort_by(|a, b| {
        let by_rate = match (a.mean_match_rate, b.mean_match_rate) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_rate.then_with(|| a.variable.cmp(&b.variable))
    });
    out
}
