//! Reconciliation method identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::ReconcileError;

/// A reconciliation method. Every method produces a projection matrix P
/// with the reconciled forecast `S * P * y_hat`, so reconciled forecasts
/// are coherent by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// Keep the bottom forecasts and re-aggregate them upward.
    BottomUp,
    /// Distribute the top forecast by the mean of the historical
    /// bottom-to-top ratios (zero-top steps are skipped).
    TopDownAverageProportions,
    /// Distribute the top forecast by the ratio of historical bottom
    /// means.
    TopDownProportionAverages,
    /// Trace minimisation with an identity weight matrix (OLS).
    MinTraceOls,
    /// Trace minimisation weighted by per-series residual variances.
    MinTraceWlsVar,
    /// Trace minimisation with a Schafer-Strimmer shrunk residual
    /// covariance.
    MinTraceShrink,
    /// Empirical risk minimisation of the projection on in-sample
    /// fitted values, ridge-stabilised.
    Erm,
}

impl Method {
    /// All methods, in canonical output order.
    pub fn all() -> [Method; 7] {
        [
            Method::BottomUp,
            Method::TopDownAverageProportions,
            Method::TopDownProportionAverages,
            Method::MinTraceOls,
            Method::MinTraceWlsVar,
            Method::MinTraceShrink,
            Method::Erm,
        ]
    }

    /// Stable key used for output column names and configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            Method::BottomUp => "bottom_up",
            Method::TopDownAverageProportions => "top_down_average_proportions",
            Method::TopDownProportionAverages => "top_down_proportion_averages",
            Method::MinTraceOls => "min_trace_ols",
            Method::MinTraceWlsVar => "min_trace_wls_var",
            Method::MinTraceShrink => "min_trace_shrink",
            Method::Erm => "erm",
        }
    }

    /// Whether the method is only meaningful on a strictly nested
    /// hierarchy. Top-down disaggregation follows a single path from the
    /// root, which grouped (crossed) structures do not have.
    pub fn requires_nested(&self) -> bool {
        matches!(
            self,
            Method::TopDownAverageProportions | Method::TopDownProportionAverages
        )
    }

    /// Whether the projection needs in-sample residuals.
    pub fn requires_residuals(&self) -> bool {
        matches!(
            self,
            Method::MinTraceWlsVar | Method::MinTraceShrink | Method::Erm
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Method {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::all()
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| ReconcileError::UnknownMethod {
                name: s.to_string(),
            })
    }
}
