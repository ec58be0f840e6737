//! # hermes-evaluate
//!
//! Scores reconciled forecasts against the held-out test window of each
//! item. Every point column of a [`hermes_io::ForecastFrame`] is scored
//! with MSSE (squared error scaled by the in-sample seasonal-naive
//! error) and with a scaled CRPS read off the interval band columns.
//! Scores are averaged per hierarchy level, per item, and across items
//! into a single JSON report.
//!
//! A metric can be undefined for a series, for example MSSE on a series
//! whose training window repeats exactly at the seasonal lag, or CRPS on
//! an all-zero test window. Undefined scores are skipped when averaging
//! and surface as `null` in the report.

mod config;
mod error;
mod output;
mod scoring;

pub use config::EvaluateConfig;
pub use error::EvaluateError;
pub use output::{ConfigSummary, EvaluationOutput, ItemScores, LevelScores, MethodScores};
pub use scoring::{msse, pinball, scaled_crps};

use std::collections::BTreeMap;
use std::ops::Range;

use hermes_hierarchy::LevelTags;
use hermes_io::{hi_column, lo_column, ForecastFrame, PanelFrame};
use tracing::{debug, info};

/// Pseudo-level covering every series of an item.
pub const ALL_LEVEL: &str = "all";

/// Scores every point column of `forecast` for one item.
///
/// `train` and `test` are the two halves of the item's panel in the same
/// row order; `tags` names the level each row belongs to. Metrics are
/// computed per series, then averaged per level (plus the [`ALL_LEVEL`]
/// group over all rows), skipping series where a metric is undefined.
///
/// # Errors
///
/// Returns [`EvaluateError::Validation`] when the frames disagree on
/// series order, horizon, or tag coverage, [`EvaluateError::MissingSeries`]
/// when the forecast and test ids do not match, and
/// [`EvaluateError::MissingColumn`] when a point column lacks one of the
/// band columns implied by the configured interval levels.
#[tracing::instrument(skip_all, fields(item = item, n_series = test.n_series()))]
pub fn evaluate_item(
    item: &str,
    train: &PanelFrame,
    test: &PanelFrame,
    tags: &LevelTags,
    forecast: &ForecastFrame,
    config: &EvaluateConfig,
) -> Result<ItemScores, EvaluateError> {
    validate_frames(train, test, tags, forecast)?;

    // Forecast row per test row; ids may be stored in a different order.
    let rows = test
        .ids()
        .iter()
        .map(|id| {
            forecast
                .ids()
                .iter()
                .position(|x| x == id)
                .ok_or_else(|| EvaluateError::MissingSeries {
                    id: id.clone(),
                    location: "forecast frame".to_string(),
                })
        })
        .collect::<Result<Vec<usize>, EvaluateError>>()?;

    let mut per_method: Vec<(String, Vec<Option<f64>>, Vec<Option<f64>>)> = Vec::new();
    for (name, point) in forecast.columns() {
        if !is_point_column(name) {
            continue;
        }

        let mut bands = Vec::with_capacity(config.levels().len() * 2);
        for &level in config.levels() {
            let lo_p = (1.0 - level / 100.0) / 2.0;
            let lo_name = lo_column(name, level);
            let lo = forecast
                .column(&lo_name)
                .ok_or(EvaluateError::MissingColumn { name: lo_name })?;
            let hi_name = hi_column(name, level);
            let hi = forecast
                .column(&hi_name)
                .ok_or(EvaluateError::MissingColumn { name: hi_name })?;
            bands.push((lo_p, lo));
            bands.push((1.0 - lo_p, hi));
        }

        let mut msse_by_series = Vec::with_capacity(test.n_series());
        let mut crps_by_series = Vec::with_capacity(test.n_series());
        for (i, &row) in rows.iter().enumerate() {
            let actual = test.series(i).to_vec();
            let history = train.series(i).to_vec();
            let point_row = point.row(row).to_vec();
            msse_by_series.push(scoring::msse(
                &actual,
                &point_row,
                &history,
                config.seasonality(),
            ));
            let grid: Vec<(f64, Vec<f64>)> = bands
                .iter()
                .map(|(p, values)| (*p, values.row(row).to_vec()))
                .collect();
            crps_by_series.push(scoring::scaled_crps(&actual, &grid));
        }
        per_method.push((name.clone(), msse_by_series, crps_by_series));
    }
    if per_method.is_empty() {
        return Err(EvaluateError::Validation {
            count: 1,
            details: "forecast frame has no point columns".to_string(),
        });
    }

    let mut levels = LevelScores::new();
    if config.per_level() {
        for tag in tags.iter() {
            levels.insert(tag.name().to_string(), score_range(&per_method, tag.range()));
        }
    }
    levels.insert(
        ALL_LEVEL.to_string(),
        score_range(&per_method, 0..test.n_series()),
    );

    debug!(methods = per_method.len(), levels = levels.len(), "scored item");
    Ok(ItemScores {
        item: item.to_string(),
        levels,
    })
}

/// Cross-item means of per-item scores.
///
/// Metrics average over the items where they are defined; `n_series`
/// sums the contributing series.
pub fn summarize(items: &BTreeMap<String, LevelScores>) -> LevelScores {
    #[derive(Default)]
    struct Cell {
        msse: Vec<Option<f64>>,
        crps: Vec<Option<f64>>,
        n_series: usize,
    }

    let mut acc: BTreeMap<&str, BTreeMap<&str, Cell>> = BTreeMap::new();
    for levels in items.values() {
        for (level, methods) in levels {
            let level_acc = acc.entry(level).or_default();
            for (method, scores) in methods {
                let cell: &mut Cell = level_acc.entry(method).or_default();
                cell.msse.push(scores.msse);
                cell.crps.push(scores.scaled_crps);
                cell.n_series += scores.n_series;
            }
        }
    }

    acc.into_iter()
        .map(|(level, methods)| {
            let table = methods
                .into_iter()
                .map(|(method, cell)| {
                    (
                        method.to_string(),
                        MethodScores {
                            msse: mean_defined(&cell.msse),
                            scaled_crps: mean_defined(&cell.crps),
                            n_series: cell.n_series,
                        },
                    )
                })
                .collect();
            (level.to_string(), table)
        })
        .collect()
}

/// Assembles the full report from per-item scores.
#[tracing::instrument(skip_all, fields(n_items = items.len()))]
pub fn evaluate(items: Vec<ItemScores>, horizon: usize, config: &EvaluateConfig) -> EvaluationOutput {
    let items: BTreeMap<String, LevelScores> = items
        .into_iter()
        .map(|scores| (scores.item, scores.levels))
        .collect();
    let summary = summarize(&items);
    info!(
        n_items = items.len(),
        levels = summary.len(),
        "assembled evaluation report"
    );
    EvaluationOutput {
        config: ConfigSummary {
            levels: config.levels().to_vec(),
            seasonality: config.seasonality(),
            horizon,
            n_items: items.len(),
        },
        items,
        summary,
    }
}

fn is_point_column(name: &str) -> bool {
    !name.contains("-lo-") && !name.contains("-hi-")
}

/// Mean of the defined values, `None` when every value is undefined.
fn mean_defined(values: &[Option<f64>]) -> Option<f64> {
    let flat: Vec<f64> = values.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    hermes_stats::finite_mean(&flat)
}

fn score_range(
    per_method: &[(String, Vec<Option<f64>>, Vec<Option<f64>>)],
    range: Range<usize>,
) -> BTreeMap<String, MethodScores> {
    per_method
        .iter()
        .map(|(method, msse_by_series, crps_by_series)| {
            (
                method.clone(),
                MethodScores {
                    msse: mean_defined(&msse_by_series[range.clone()]),
                    scaled_crps: mean_defined(&crps_by_series[range.clone()]),
                    n_series: range.len(),
                },
            )
        })
        .collect()
}

fn validate_frames(
    train: &PanelFrame,
    test: &PanelFrame,
    tags: &LevelTags,
    forecast: &ForecastFrame,
) -> Result<(), EvaluateError> {
    let mut problems = Vec::new();
    if train.ids() != test.ids() {
        problems.push("train and test windows disagree on series".to_string());
    }
    if forecast.horizon() != test.n_dates() {
        problems.push(format!(
            "forecast horizon {} does not match the {}-step test window",
            forecast.horizon(),
            test.n_dates()
        ));
    }
    if tags.n_rows() != test.n_series() {
        problems.push(format!(
            "level tags cover {} rows, the panel has {}",
            tags.n_rows(),
            test.n_series()
        ));
    }
    if !problems.is_empty() {
        return Err(EvaluateError::Validation {
            count: problems.len(),
            details: problems.join("; "),
        });
    }
    for id in forecast.ids() {
        if test.position(id).is_none() {
            return Err(EvaluateError::MissingSeries {
                id: id.clone(),
                location: "test window".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_columns_exclude_band_names() {
        assert!(is_point_column("base"));
        assert!(is_point_column("min_trace_shrink"));
        assert!(!is_point_column("base-lo-95"));
        assert!(!is_point_column("erm-hi-80"));
    }

    #[test]
    fn mean_defined_skips_undefined_entries() {
        assert_eq!(mean_defined(&[Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(mean_defined(&[None, None]), None);
        assert_eq!(mean_defined(&[]), None);
    }
}
