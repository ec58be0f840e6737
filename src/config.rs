use std::path::PathBuf;

use serde::Deserialize;

/// Top-level hermes configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HermesConfig {
    /// Dataset settings.
    #[serde(default)]
    pub data: DataToml,

    /// Base model settings.
    #[serde(default)]
    pub model: ModelToml,

    /// Reconciliation settings.
    #[serde(default)]
    pub reconcile: ReconcileToml,

    /// Evaluation settings.
    #[serde(default)]
    pub evaluate: EvaluateToml,

    /// Output and cache directories.
    #[serde(default)]
    pub io: IoToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataToml {
    /// Sales table path (.csv or .parquet).
    pub input: Option<PathBuf>,
    #[serde(default = "default_key_columns")]
    pub key_columns: Vec<String>,
    #[serde(default = "default_item_column")]
    pub item_column: String,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_target_column")]
    pub target_column: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Hierarchy levels as key-column paths, coarsest first; the last
    /// path is the bottom level.
    #[serde(default = "default_levels")]
    pub levels: Vec<Vec<String>>,
}

impl Default for DataToml {
    fn default() -> Self {
        Self {
            input: None,
            key_columns: default_key_columns(),
            item_column: default_item_column(),
            date_column: default_date_column(),
            target_column: default_target_column(),
            date_format: default_date_format(),
            levels: default_levels(),
        }
    }
}

fn default_key_columns() -> Vec<String> {
    vec!["state_id".to_string(), "store_id".to_string()]
}
fn default_item_column() -> String {
    "item_id".to_string()
}
fn default_date_column() -> String {
    "ds".to_string()
}
fn default_target_column() -> String {
    "y".to_string()
}
fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}
fn default_levels() -> Vec<Vec<String>> {
    vec![
        vec!["state_id".to_string()],
        vec!["state_id".to_string(), "store_id".to_string()],
    ]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    /// Forecast horizon (test window length) in steps.
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    /// Largest AR order tried by the AIC search.
    #[serde(default = "default_max_order")]
    pub max_order: usize,
}

impl Default for ModelToml {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            max_order: default_max_order(),
        }
    }
}

fn default_horizon() -> usize {
    28
}
fn default_max_order() -> usize {
    5
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconcileToml {
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    /// Central interval levels in percent.
    #[serde(default = "default_interval_levels")]
    pub levels: Vec<f64>,
    /// Interval construction: "bootstrap" or "normality".
    #[serde(default = "default_intervals")]
    pub intervals: String,
    #[serde(default = "default_num_samples")]
    pub num_samples: usize,
    /// One reconciled output set per seed (bootstrap only).
    #[serde(default = "default_seeds")]
    pub seeds: Vec<u64>,
}

impl Default for ReconcileToml {
    fn default() -> Self {
        Self {
            methods: default_methods(),
            levels: default_interval_levels(),
            intervals: default_intervals(),
            num_samples: default_num_samples(),
            seeds: default_seeds(),
        }
    }
}

fn default_methods() -> Vec<String> {
    vec![
        "bottom_up".to_string(),
        "top_down_average_proportions".to_string(),
        "top_down_proportion_averages".to_string(),
        "min_trace_ols".to_string(),
        "min_trace_wls_var".to_string(),
        "min_trace_shrink".to_string(),
        "erm".to_string(),
    ]
}
fn default_interval_levels() -> Vec<f64> {
    vec![80.0, 95.0]
}
fn default_intervals() -> String {
    "bootstrap".to_string()
}
fn default_num_samples() -> usize {
    200
}
fn default_seeds() -> Vec<u64> {
    vec![0]
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluateToml {
    /// Interval levels scored by CRPS; defaults to the reconcile levels.
    #[serde(default)]
    pub levels: Option<Vec<f64>>,
    /// Seasonal lag of the MSSE denominator (1 = plain naive).
    #[serde(default = "default_seasonality")]
    pub seasonality: usize,
    #[serde(default = "default_true")]
    pub per_level: bool,
}

impl Default for EvaluateToml {
    fn default() -> Self {
        Self {
            levels: None,
            seasonality: default_seasonality(),
            per_level: true,
        }
    }
}

fn default_seasonality() -> usize {
    7
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    /// Directory for per-item reconciled CSVs.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Directory for per-item base forecast and fitted-value caches.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("forecasts")
}
fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}
