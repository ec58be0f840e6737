//! Serializable score reports.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::EvaluateError;

/// Scores keyed by hierarchy level, then reconciliation method.
pub type LevelScores = BTreeMap<String, BTreeMap<String, MethodScores>>;

/// Accuracy of one reconciliation method over one group of series.
///
/// `None` marks a metric whose scale was undefined for every series in
/// the group; it serializes as JSON `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MethodScores {
    pub msse: Option<f64>,
    pub scaled_crps: Option<f64>,
    pub n_series: usize,
}

/// Scores for a single item, broken down by level and method.
#[derive(Debug, Clone, Serialize)]
pub struct ItemScores {
    pub item: String,
    pub levels: LevelScores,
}

/// Echo of the evaluation settings alongside the scores.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub levels: Vec<f64>,
    pub seasonality: usize,
    pub horizon: usize,
    pub n_items: usize,
}

/// Full evaluation report: per-item scores plus cross-item means.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationOutput {
    pub config: ConfigSummary,
    pub items: BTreeMap<String, LevelScores>,
    pub summary: LevelScores,
}

impl EvaluationOutput {
    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, EvaluateError> {
        serde_json::to_string_pretty(self).map_err(|err| EvaluateError::Serialization {
            reason: err.to_string(),
        })
    }
}
