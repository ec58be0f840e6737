//! Forecast reconciliation for sales hierarchies.
//!
//! Base forecasts produced per series rarely add up: the forecast for a
//! state does not equal the sum of its store forecasts. This crate maps
//! base forecasts onto coherent ones through a bottom-level projection,
//! `rec = S * P * base`, and wraps them in prediction intervals.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │  projection   │────▶│  combination   │────▶│    intervals     │
//!  │  (per method) │     │  (S * P * y)   │     │ (bootstrap/norm) │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```ignore
//! use hermes_reconcile::{reconcile, BaseForecasts, Method, ReconcileConfig};
//!
//! let base = BaseForecasts::new(mean, sigma, residuals)?;
//! let config = ReconcileConfig::default()
//!     .with_methods(vec![Method::BottomUp, Method::MinTraceShrink])
//!     .with_seeds(vec![0, 1, 2]);
//! let reconciled = reconcile(&hierarchy, &base, &config)?;
//! for set in reconciled.sets() {
//!     let points = set.column("min_trace_shrink");
//! }
//! ```

mod base;
mod bootstrap;
mod bottom_up;
mod config;
mod erm;
mod error;
mod linalg;
mod method;
mod min_trace;
mod normality;
mod reconciler;
mod residuals;
mod shrink;
mod top_down;

pub use base::BaseForecasts;
pub use config::{IntervalMethod, ReconcileConfig};
pub use error::ReconcileError;
pub use method::Method;
pub use reconciler::{method_set, reconcile, Reconciled, ReconciledSet};
