//! Base-forecast bundle consumed by the reconciler.

use ndarray::{Array2, ArrayView2};

use crate::error::ReconcileError;

/// Per-series base forecasts in hierarchy row order.
///
/// Rows follow the canonical series order of the hierarchy the forecasts
/// were produced for: aggregates first, bottom series last. `mean` and
/// `sigma` are `(n_series, horizon)`, `residuals` is `(n_series, n_train)`
/// and may carry NaN entries where a model has no complete lag window.
#[derive(Debug, Clone)]
pub struct BaseForecasts {
    mean: Array2<f64>,
    sigma: Array2<f64>,
    residuals: Array2<f64>,
}

impl BaseForecasts {
    /// Bundles base forecasts after shape and finiteness checks.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::DimensionMismatch`] when the three
    /// matrices disagree on the number of series or `sigma` does not
    /// match the forecast horizon, and [`ReconcileError::NonFinite`]
    /// when `mean` contains non-finite entries or `sigma` contains
    /// entries that are negative or non-finite.
    pub fn new(
        mean: Array2<f64>,
        sigma: Array2<f64>,
        residuals: Array2<f64>,
    ) -> Result<Self, ReconcileError> {
        if sigma.nrows() != mean.nrows() {
            return Err(ReconcileError::DimensionMismatch {
                name: "sigma rows".to_string(),
                expected: mean.nrows(),
                got: sigma.nrows(),
            });
        }
        if residuals.nrows() != mean.nrows() {
            return Err(ReconcileError::DimensionMismatch {
                name: "residual rows".to_string(),
                expected: mean.nrows(),
                got: residuals.nrows(),
            });
        }
        if sigma.ncols() != mean.ncols() {
            return Err(ReconcileError::DimensionMismatch {
                name: "sigma columns".to_string(),
                expected: mean.ncols(),
                got: sigma.ncols(),
            });
        }
        if mean.iter().any(|v| !v.is_finite()) {
            return Err(ReconcileError::NonFinite {
                name: "base mean".to_string(),
            });
        }
        if sigma.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ReconcileError::NonFinite {
                name: "base sigma".to_string(),
            });
        }
        Ok(Self {
            mean,
            sigma,
            residuals,
        })
    }

    /// Forecast means, `(n_series, horizon)`.
    pub fn mean(&self) -> ArrayView2<'_, f64> {
        self.mean.view()
    }

    /// Per-step forecast standard deviations, `(n_series, horizon)`.
    pub fn sigma(&self) -> ArrayView2<'_, f64> {
        self.sigma.view()
    }

    /// In-sample residuals, `(n_series, n_train)`.
    pub fn residuals(&self) -> ArrayView2<'_, f64> {
        self.residuals.view()
    }

    pub fn n_series(&self) -> usize {
        self.mean.nrows()
    }

    pub fn horizon(&self) -> usize {
        self.mean.ncols()
    }

    pub fn n_train(&self) -> usize {
        self.residuals.ncols()
    }
}
