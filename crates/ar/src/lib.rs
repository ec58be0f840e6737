//! # hermes-ar
//!
//! Per-series AR(p) forecasting for demand panels: Yule-Walker fitting
//! via the Levinson-Durbin recursion, AIC order selection and a naive
//! random-walk fallback for series no AR model explains.
//!
//! ## Typestate Workflow
//!
//! ```mermaid
//! graph LR
//!     A["ArSpec::new(p)"] -->|".fit(&data)?"| B["ArFit"]
//!     B --> C[".phi() — AR coefficients"]
//!     B --> D[".sigma2() — innovation variance"]
//!     B --> E[".aic() — Akaike Information Criterion"]
//!     B --> F[".forecast(horizon)"]
//!     G["auto_fit(&data, max_p)?"] -->|"order search"| B
//!     H["fit_with_fallback(&data, max_p)?"] --> I["FittedModel"]
//! ```
//!
//! ## Two Usage Paths
//!
//! **Direct fit** (known order):
//! ```ignore
//! let fit = ArSpec::new(2).fit(&data)?;
//! ```
//!
//! **Pipeline fit** (order unknown, degenerate series possible):
//! ```ignore
//! let (model, fell_back) = fit_with_fallback(&data, 5)?;
//! let forecast = model.forecast(28);
//! ```
//!
//! ## Mathematical Glossary
//!
//! | Symbol | Accessor | Meaning |
//! |--------|----------|---------|
//! | phi | [`ArFit::phi()`] | AR coefficients: weights on past observations |
//! | sigma2 | [`ArFit::sigma2()`] | Innovation (white-noise) variance |
//! | AIC | [`ArFit::aic()`] | Akaike Information Criterion (lower = better) |
//! | psi | — | Moving-average weights behind the forecast variance |

mod error;
mod fit;
mod forecast;
mod model;
mod naive;
mod selection;
mod spec;

pub(crate) mod levinson;

pub use error::ArError;
pub use fit::ArFit;
pub use forecast::SeriesForecast;
pub use model::FittedModel;
pub use naive::NaiveFit;
pub use selection::{auto_fit, fit_with_fallback};
pub use spec::ArSpec;
