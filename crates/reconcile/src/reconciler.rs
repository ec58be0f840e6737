//! Reconciliation driver.
//!
//! Builds one projection per requested method, combines them with the
//! summing matrix and turns base forecasts into coherent point forecasts
//! plus prediction intervals. Bootstrap intervals produce one output set
//! per seed; normality intervals produce a single seed-independent set.

use hermes_hierarchy::Hierarchy;
use hermes_io::{hi_column, lo_column, BASE_COLUMN};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::base::BaseForecasts;
use crate::bootstrap;
use crate::bottom_up;
use crate::config::{IntervalMethod, ReconcileConfig};
use crate::erm;
use crate::error::ReconcileError;
use crate::method::Method;
use crate::min_trace;
use crate::normality;
use crate::top_down;

/// One reconciled output set: point forecasts and interval bands for
/// every method, tied to the seed that produced the bands.
#[derive(Debug, Clone)]
pub struct ReconciledSet {
    seed: Option<u64>,
    columns: Vec<(String, Array2<f64>)>,
}

impl ReconciledSet {
    /// Seed behind the bootstrap bands, `None` for normality intervals.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Columns in output order, each `(n_series, horizon)`.
    pub fn columns(&self) -> &[(String, Array2<f64>)] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Array2<f64>> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn into_columns(self) -> Vec<(String, Array2<f64>)> {
        self.columns
    }
}

/// Reconciled forecasts for every requested method and seed.
#[derive(Debug, Clone)]
pub struct Reconciled {
    sets: Vec<ReconciledSet>,
}

impl Reconciled {
    pub fn sets(&self) -> &[ReconciledSet] {
        &self.sets
    }

    pub fn into_sets(self) -> Vec<ReconciledSet> {
        self.sets
    }
}

/// Requested methods filtered for the hierarchy at hand.
///
/// Top-down methods need every non-bottom series to sit on a single
/// aggregation path, so they are dropped (with a warning) when the
/// hierarchy is not strictly nested. All other methods also apply to
/// grouped hierarchies.
pub fn method_set(requested: &[Method], nested: bool) -> Vec<Method> {
    if nested {
        return requested.to_vec();
    }
    let (kept, dropped): (Vec<Method>, Vec<Method>) = requested
        .iter()
        .copied()
        .partition(|m| !m.requires_nested());
    if !dropped.is_empty() {
        warn!(
            ?dropped,
            "dropping top-down methods, hierarchy is not strictly nested"
        );
    }
    kept
}

/// Reconciles base forecasts against a hierarchy.
///
/// The output carries the base forecast under the `base` column next to
/// one point column per method, plus `-lo-`/`-hi-` band columns for each
/// configured level. Bootstrap draws are made once per seed and shared
/// across methods, so sets are comparable sample by sample.
///
/// # Errors
///
/// Fails when the configuration is invalid, when the base forecasts do
/// not match the hierarchy's shape, or when a method cannot be built
/// from the available residuals.
#[tracing::instrument(skip_all, fields(n_series = base.n_series(), horizon = base.horizon()))]
pub fn reconcile(
    hierarchy: &Hierarchy,
    base: &BaseForecasts,
    config: &ReconcileConfig,
) -> Result<Reconciled, ReconcileError> {
    config.validate()?;

    let frame = hierarchy.frame();
    if base.n_series() != frame.n_series() {
        return Err(ReconcileError::DimensionMismatch {
            name: "base series".to_string(),
            expected: frame.n_series(),
            got: base.n_series(),
        });
    }
    if base.n_train() != frame.n_dates() {
        return Err(ReconcileError::DimensionMismatch {
            name: "training columns".to_string(),
            expected: frame.n_dates(),
            got: base.n_train(),
        });
    }

    let methods = method_set(config.methods(), hierarchy.is_strictly_nested());
    if methods.is_empty() {
        return Err(ReconcileError::InvalidConfig {
            count: 1,
            details: "no methods remain after dropping top-down (hierarchy is not strictly nested)"
                .to_string(),
        });
    }

    let summing = hierarchy.summing();
    let train = frame.values().view();
    let residuals = base.residuals();
    let mut combinations = Vec::with_capacity(methods.len());
    for &method in &methods {
        let projection = match method {
            Method::BottomUp => bottom_up::projection(summing),
            Method::TopDownAverageProportions => top_down::average_proportions(summing, train)?,
            Method::TopDownProportionAverages => top_down::proportion_averages(summing, train)?,
            Method::MinTraceOls => min_trace::ols(summing)?,
            Method::MinTraceWlsVar => min_trace::wls_var(summing, residuals)?,
            Method::MinTraceShrink => min_trace::shrink(summing, residuals)?,
            Method::Erm => erm::projection(summing, train, residuals)?,
        };
        let combination = summing.values().dot(&projection);
        let point = combination.dot(&base.mean());
        combinations.push((method, combination, point));
    }

    let levels = config.levels();
    let mut sets = Vec::new();
    match config.intervals() {
        IntervalMethod::Bootstrap { num_samples } => {
            for &seed in config.seeds() {
                let mut rng = StdRng::seed_from_u64(seed);
                let paths =
                    bootstrap::base_paths(base.mean(), residuals, num_samples, &mut rng)?;
                let mut columns = Vec::new();
                columns.push((BASE_COLUMN.to_string(), base.mean().to_owned()));
                append_bands(
                    BASE_COLUMN,
                    bootstrap::quantile_bands(&paths, levels),
                    &mut columns,
                );
                for (method, combination, point) in &combinations {
                    columns.push((method.key().to_string(), point.clone()));
                    let projected: Vec<Array2<f64>> =
                        paths.iter().map(|path| combination.dot(path)).collect();
                    append_bands(
                        method.key(),
                        bootstrap::quantile_bands(&projected, levels),
                        &mut columns,
                    );
                }
                sets.push(ReconciledSet {
                    seed: Some(seed),
                    columns,
                });
            }
        }
        IntervalMethod::Normality => {
            let mut columns = Vec::new();
            columns.push((BASE_COLUMN.to_string(), base.mean().to_owned()));
            append_bands(
                BASE_COLUMN,
                normality::bands_from_sigma(base.mean(), base.sigma(), levels)?,
                &mut columns,
            );
            for (method, combination, point) in &combinations {
                columns.push((method.key().to_string(), point.clone()));
                let sigma = normality::projected_sigma(combination.view(), base.sigma());
                append_bands(
                    method.key(),
                    normality::bands_from_sigma(point.view(), sigma.view(), levels)?,
                    &mut columns,
                );
            }
            sets.push(ReconciledSet {
                seed: None,
                columns,
            });
        }
    }

    info!(
        methods = methods.len(),
        sets = sets.len(),
        "reconciled base forecasts"
    );
    Ok(Reconciled { sets })
}

fn append_bands(
    key: &str,
    bands: Vec<(f64, Array2<f64>, Array2<f64>)>,
    columns: &mut Vec<(String, Array2<f64>)>,
) {
    for (level, lo, hi) in bands {
        columns.push((lo_column(key, level), lo));
        columns.push((hi_column(key, level), hi));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_set_keeps_everything_when_nested() {
        let all = Method::all();
        assert_eq!(method_set(&all, true), all.to_vec());
    }

    #[test]
    fn method_set_drops_top_down_when_not_nested() {
        let kept = method_set(&Method::all(), false);
        assert_eq!(
            kept,
            vec![
                Method::BottomUp,
                Method::MinTraceOls,
                Method::MinTraceWlsVar,
                Method::MinTraceShrink,
                Method::Erm
            ]
        );
    }

    #[test]
    fn method_set_preserves_request_order() {
        let requested = vec![Method::Erm, Method::BottomUp];
        assert_eq!(method_set(&requested, false), requested);
    }
}
