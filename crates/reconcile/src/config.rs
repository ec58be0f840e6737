//! Reconciliation run configuration.

use crate::error::ReconcileError;
use crate::method::Method;

/// How prediction intervals are produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IntervalMethod {
    /// Resample complete in-sample residual columns onto the base
    /// forecasts and reconcile each sample path; bands are empirical
    /// quantiles, one output set per seed.
    Bootstrap {
        /// Sample paths per seed.
        num_samples: usize,
    },
    /// Gaussian bands from the reconciled forecast variances; seeds are
    /// ignored and a single output set is produced.
    Normality,
}

/// Configuration for a reconciliation run.
///
/// Build with [`ReconcileConfig::default()`] and the `with_*` methods:
///
/// ```
/// use hermes_reconcile::{IntervalMethod, Method, ReconcileConfig};
///
/// let config = ReconcileConfig::default()
///     .with_methods(vec![Method::BottomUp, Method::MinTraceShrink])
///     .with_levels(vec![80.0, 95.0])
///     .with_intervals(IntervalMethod::Bootstrap { num_samples: 500 })
///     .with_seeds(vec![0, 1, 2]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ReconcileConfig {
    methods: Vec<Method>,
    levels: Vec<f64>,
    intervals: IntervalMethod,
    seeds: Vec<u64>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            methods: vec![Method::BottomUp],
            levels: vec![80.0, 95.0],
            intervals: IntervalMethod::Bootstrap { num_samples: 200 },
            seeds: vec![0],
        }
    }
}

impl ReconcileConfig {
    /// Replace the method list.
    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    /// Replace the interval levels (percent). An empty list produces
    /// point forecasts only.
    pub fn with_levels(mut self, levels: Vec<f64>) -> Self {
        self.levels = levels;
        self
    }

    /// Replace the interval method.
    pub fn with_intervals(mut self, intervals: IntervalMethod) -> Self {
        self.intervals = intervals;
        self
    }

    /// Replace the bootstrap seeds.
    pub fn with_seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Requested methods, in output order.
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Interval levels in percent.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Interval method.
    pub fn intervals(&self) -> IntervalMethod {
        self.intervals
    }

    /// Bootstrap seeds.
    pub fn seeds(&self) -> &[u64] {
        &self.seeds
    }

    /// Check the configuration, accumulating every problem found.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidConfig`] listing all problems.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        let mut problems: Vec<String> = Vec::new();

        if self.methods.is_empty() {
            problems.push("at least one method is required".to_string());
        }
        let mut seen: Vec<Method> = Vec::new();
        for method in &self.methods {
            if seen.contains(method) {
                problems.push(format!("method '{method}' listed twice"));
            } else {
                seen.push(*method);
            }
        }
        for level in &self.levels {
            if !level.is_finite() || *level <= 0.0 || *level >= 100.0 {
                problems.push(format!(
                    "interval level {level} outside the open (0, 100) range"
                ));
            }
        }
        match self.intervals {
            IntervalMethod::Bootstrap { num_samples } => {
                if num_samples < 2 {
                    problems.push(format!(
                        "bootstrap needs at least 2 samples, got {num_samples}"
                    ));
                }
                if self.seeds.is_empty() {
                    problems.push("bootstrap needs at least one seed".to_string());
                }
            }
            IntervalMethod::Normality => {}
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ReconcileError::InvalidConfig {
                count: problems.len(),
                details: problems.join("; "),
            })
        }
    }
}
